//! Locus input resolution: genes, intervals, variant identifiers and rsIDs.
//!
//! Pure validation, no I/O. Parsing a variant identifier is delegated to a caller-supplied
//! function so each backend can apply its own identifier grammar.

pub mod error;
pub mod resolver;
pub mod xpos;

#[cfg(test)]
mod tests;

pub use error::{IdentifierError, IdentifierErrorKind, LocusError};
pub use resolver::{
    GeneCatalog, LocusItems, LocusResolution, VariantItems, parse_interval,
    parse_locus_list_items, parse_variant_items, resolve_locus,
};
pub use xpos::{chrom_index, get_xpos, normalize_chrom, parse_variant_id, strip_chr_prefix};
