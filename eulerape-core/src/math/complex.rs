use std::fmt::{Display, Formatter, self};

use serde::{Deserialize, Serialize};

/// One member of a complex-conjugate root pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Complex<D> {
    pub re: D,
    pub im: D,
}

impl<D: Display> Display for Complex<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}i", self.re, self.im)
    }
}
