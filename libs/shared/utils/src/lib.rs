pub mod dates;
pub mod masks;
pub mod test_utils;
