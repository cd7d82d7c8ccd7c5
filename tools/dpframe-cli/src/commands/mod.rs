pub mod frame;
pub mod generate;
pub mod inspect;
