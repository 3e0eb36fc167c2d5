pub mod advisor;
pub mod syllable;
pub mod zhuyin;

pub use advisor::advise_with;
pub use zhuyin::{PhoneticConverter, PinyinZhuyinConverter};
