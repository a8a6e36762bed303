//! Build regular expressions from typed fragments instead of writing the
//! pattern string by hand.
//!
//! ```
//! # use regex_maker::RegEx;
//! let mut rx = RegEx::new();
//! rx.add_and(["http"])?
//!     .add_option(["s"])?
//!     .add_and(["://"])?
//!     .add_option(["www."])?;
//! assert_eq!(rx.render(), r"/(?:http)(?:s)?(?:\:\/\/)(?:www\.)?/");
//! assert_eq!(rx.test("https://www.example.com")?, ["https://www."]);
//! # Ok::<(), regex_maker::Error>(())
//! ```

mod bound;
mod builder;
mod engine;
mod error;
pub mod escape;
mod fragment;
mod modifier;
mod settings;
mod tree;
mod visualize;

pub use bound::*;
pub use builder::*;
pub use engine::*;
pub use error::*;
pub use escape::DELIMITER;
pub use fragment::*;
pub use modifier::*;
pub use settings::*;
pub use tree::*;
pub use visualize::VisualizeMode;
