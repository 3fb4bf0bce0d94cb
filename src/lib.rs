pub mod parking;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
