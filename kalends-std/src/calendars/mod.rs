//! Standard calendar descriptors

mod iso;
mod gregorian;
mod julian;
mod coptic;
mod hijri;
mod persian;
mod indian;
mod hebrew;

pub use iso::Iso;
pub use gregorian::{Buddhist, Gregorian, Japanese, Roc};
pub use julian::Julian;
pub use coptic::{Coptic, Ethiopian, EthiopianAmeteAlem};
pub use hijri::HijriTabular;
pub use persian::Persian;
pub use indian::Indian;
pub use hebrew::Hebrew;
