#![cfg(test)]

mod propagators;
