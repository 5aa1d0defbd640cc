use std::fmt::{self, Debug, Display};

/// A cell that may be missing (NA, Not Available)
///
/// Columns store `NA<T>` instead of `Option<T>` so that missing values read
/// as `NA` in debug output and CSV exports.
#[derive(Clone, Copy, PartialEq)]
pub enum NA<T> {
    /// A present value
    Value(T),
    /// A missing value
    NA,
}

impl<T> NA<T> {
    /// Whether the cell is missing
    pub fn is_na(&self) -> bool {
        matches!(self, NA::NA)
    }

    /// Borrow the value, if present
    pub fn value(&self) -> Option<&T> {
        match self {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

impl<T> From<T> for NA<T> {
    fn from(value: T) -> Self {
        NA::Value(value)
    }
}

impl<T> From<Option<T>> for NA<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => NA::Value(v),
            None => NA::NA,
        }
    }
}

impl<T> From<NA<T>> for Option<T> {
    fn from(na: NA<T>) -> Self {
        match na {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

impl<T: Debug> Debug for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{:?}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: Display> Display for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}
