mod mnist;

pub use mnist::{Mnist, MnistError};
