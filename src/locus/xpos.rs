use crate::constants::{CHROMOSOMES, MAX_POSITION, MIN_POSITION, XPOS_CHROM_FACTOR};
use crate::model::VariantIdentifier;

use super::error::IdentifierError;

/// Drops a leading `chr`, in any letter case.
pub fn strip_chr_prefix(value: &str) -> &str {
    match value.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &value[3..],
        _ => value,
    }
}

/// Canonical chromosome name: no `chr` prefix, upper case, `MT` folded into `M`.
pub fn normalize_chrom(chrom: &str) -> String {
    let chrom = strip_chr_prefix(chrom).to_ascii_uppercase();
    if chrom == "MT" { "M".to_string() } else { chrom }
}

/// Zero-based rank of a chromosome in xpos order.
pub fn chrom_index(chrom: &str) -> Option<usize> {
    let chrom = normalize_chrom(chrom);
    CHROMOSOMES.iter().position(|c| *c == chrom)
}

/// Cross-chromosome ordinal: `(rank + 1) * 1e9 + pos`.
pub fn get_xpos(chrom: &str, pos: u64) -> Result<u64, IdentifierError> {
    let index = chrom_index(chrom).ok_or_else(|| IdentifierError::UnknownChromosome {
        chrom: chrom.to_string(),
    })?;

    if !(MIN_POSITION..=MAX_POSITION).contains(&pos) {
        return Err(IdentifierError::PositionOutOfRange { pos });
    }

    Ok((index as u64 + 1) * XPOS_CHROM_FACTOR + pos)
}

/// Parses `chrom-pos-ref-alt`. Only the shape is checked here; see [`get_xpos`] for the
/// coordinate.
pub fn parse_variant_id(token: &str) -> Result<VariantIdentifier, IdentifierError> {
    let malformed = || IdentifierError::Malformed {
        token: token.to_string(),
    };

    let parts: Vec<&str> = token.split('-').collect();
    let [chrom, pos, ref_allele, alt_allele] = *parts.as_slice() else {
        return Err(malformed());
    };

    let pos: u64 = pos.parse().map_err(|_| malformed())?;
    let is_allele = |allele: &str| !allele.is_empty() && allele.chars().all(|c| c.is_ascii_alphabetic());
    if chrom.is_empty() || !is_allele(ref_allele) || !is_allele(alt_allele) {
        return Err(malformed());
    }

    Ok(VariantIdentifier {
        chrom: strip_chr_prefix(chrom).to_string(),
        pos,
        ref_allele: ref_allele.to_ascii_uppercase(),
        alt_allele: alt_allele.to_ascii_uppercase(),
    })
}
