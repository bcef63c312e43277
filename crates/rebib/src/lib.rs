//! rebib — specification-driven BibTeX dialect conversion
//!
//! The engine reads raw BibTeX text, parses every entry, and re-emits
//! each one according to a declarative JSON format specification:
//! field renames, value transforms, required/default handling, and
//! per-type policies for unmapped fields. The whole input is parsed once
//! and the specification is built once, shared read-only across all
//! entries.
//!
//! ```
//! let spec = r#"{"article": {"fields": [{"source": "title", "target": "booktitle"}]}}"#;
//! let outcome = rebib::convert(
//!     "@article{doe2020, title={Deep Learning}, year=2020}",
//!     spec,
//! ).unwrap();
//! assert_eq!(
//!     outcome.outputs,
//!     vec!["@article{doe2020, booktitle = {Deep Learning}, year = {2020}}"]
//! );
//! ```

pub mod authors;
mod convert;
mod emit;
mod error;
mod io;
mod transcode;

pub use convert::{convert, convert_entry, ConvertOutcome, EntryFailure};
pub use error::{ConvertError, TranscodeError};
pub use io::{convert_file, load_format, resolve_format};
pub use transcode::transcode_entry;

pub use rebib_format::{ConfigError, FormatSpec};
pub use rebib_syntax::{parse_entries, Entry, Field, ParseError};
