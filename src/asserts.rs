//! Tiered debug assertions. The cheap checks are always on; the expensive consistency checks
//! only run in tests or with the `debug-checks` feature enabled.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const SMART_TABLE_ASSERT_LEVEL_DEFINITION: u8 = SMART_TABLE_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const SMART_TABLE_ASSERT_LEVEL_DEFINITION: u8 = SMART_TABLE_ASSERT_EXTREME;

pub const SMART_TABLE_ASSERT_SIMPLE: u8 = 1;
pub const SMART_TABLE_ASSERT_MODERATE: u8 = 2;
pub const SMART_TABLE_ASSERT_ADVANCED: u8 = 3;
pub const SMART_TABLE_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! smart_table_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::SMART_TABLE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SMART_TABLE_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! smart_table_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::SMART_TABLE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SMART_TABLE_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! smart_table_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::SMART_TABLE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SMART_TABLE_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! smart_table_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::SMART_TABLE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SMART_TABLE_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! smart_table_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::SMART_TABLE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::SMART_TABLE_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}
