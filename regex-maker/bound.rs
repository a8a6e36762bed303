use crate::Error;

/// Upper or lower limit of a repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Finite(u64),
    Infinite,
}

pub const INFINITE: Bound = Bound::Infinite;

impl Bound {
    #[inline]
    #[must_use]
    pub fn is_infinite(self) -> bool {
        matches!(self, Bound::Infinite)
    }
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Finite(n) => write!(f, "{n}"),
            Bound::Infinite => f.write_str("infinite"),
        }
    }
}

/// Which end of a repetition a value is converted for. Only used to pick the
/// right error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Min,
    Max,
}

/// Conversion into a [`Bound`]. Signed integers use `-1` for "infinite", any
/// other negative value is rejected.
pub trait IntoBound {
    fn into_bound(self, side: BoundSide) -> Result<Bound, Error>;
}

impl IntoBound for Bound {
    #[inline]
    fn into_bound(self, _side: BoundSide) -> Result<Bound, Error> {
        Ok(self)
    }
}

macro_rules! impl_into_bound_unsigned {
    ($($t:ty),*) => {$(
        impl IntoBound for $t {
            #[inline]
            fn into_bound(self, _side: BoundSide) -> Result<Bound, Error> {
                Ok(Bound::Finite(self as u64))
            }
        }
    )*};
}

macro_rules! impl_into_bound_signed {
    ($($t:ty),*) => {$(
        impl IntoBound for $t {
            #[inline]
            fn into_bound(self, side: BoundSide) -> Result<Bound, Error> {
                match self {
                    -1 => Ok(Bound::Infinite),
                    n if n < 0 => Err(match side {
                        BoundSide::Min => Error::NegativeMinimum,
                        BoundSide::Max => Error::NegativeMaximum,
                    }),
                    n => Ok(Bound::Finite(n.unsigned_abs() as u64)),
                }
            }
        }
    )*};
}

impl_into_bound_unsigned!(u8, u16, u32, u64, usize);
impl_into_bound_signed!(i8, i16, i32, i64, isize);

/// Validated bounds of a repetition fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Repeat {
    min: u64,
    max: Bound,
}

impl Repeat {
    pub fn new(min: impl IntoBound, max: impl IntoBound) -> Result<Self, Error> {
        let min = match min.into_bound(BoundSide::Min)? {
            Bound::Finite(min) => min,
            Bound::Infinite => return Err(Error::InfiniteMinimum),
        };
        let max = max.into_bound(BoundSide::Max)?;
        if let Bound::Finite(max) = max {
            if max < min {
                return Err(Error::MaximumLessThanMinimum { min, max });
            }
        }
        Ok(Self { min, max })
    }

    #[inline]
    #[must_use]
    pub fn min(&self) -> u64 {
        self.min
    }

    #[inline]
    #[must_use]
    pub fn max(&self) -> Bound {
        self.max
    }

    /// The quantifier suffix. Empty when the group occurs exactly once.
    #[must_use]
    pub fn quantifier(&self) -> String {
        match (self.min, self.max) {
            (1, Bound::Finite(1)) => String::new(),
            (0, Bound::Finite(1)) => "?".to_owned(),
            (min, Bound::Finite(max)) if min == max => format!("{{{min}}}"),
            (min, Bound::Finite(max)) => format!("{{{min},{max}}}"),
            (0, Bound::Infinite) => "*".to_owned(),
            (1, Bound::Infinite) => "+".to_owned(),
            (min, Bound::Infinite) => format!("{{{min},}}"),
        }
    }
}
