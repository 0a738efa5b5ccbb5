//! Page-range parsing and page-order validation.
//!
//! Range specs are human input like `"1-3, 5, 7-9"`: comma-separated tokens
//! where each token is a single page or an inclusive range, 1-based. Parsed
//! output is always 0-based, sorted, and deduplicated.

use crate::error::PdfError;
use std::collections::BTreeSet;

/// Parse a page-range spec against a known page count.
///
/// Returns 0-based page indices in ascending order with duplicates removed.
/// Every endpoint must lie in `1..=total_pages`; a range token additionally
/// requires `start <= end`. Whitespace around tokens and endpoints is
/// ignored. Anything non-numeric (including an empty token) is an error,
/// never a silent skip; a swallowed token would extract the wrong pages.
pub fn parse_page_ranges(spec: &str, total_pages: usize) -> Result<Vec<usize>, PdfError> {
    let mut pages = BTreeSet::new();

    for token in spec.split(',') {
        let token = token.trim();

        if let Some((start, end)) = token.split_once('-') {
            let start = parse_page_number(start)?;
            let end = parse_page_number(end)?;
            check_bounds(start, total_pages)?;
            check_bounds(end, total_pages)?;
            if start > end {
                return Err(PdfError::InvalidRange(format!(
                    "start {} is after end {}",
                    start, end
                )));
            }
            pages.extend(start - 1..end);
        } else {
            let page = parse_page_number(token)?;
            check_bounds(page, total_pages)?;
            pages.insert(page - 1);
        }
    }

    Ok(pages.into_iter().collect())
}

/// Validate an explicit 1-based page ordering, converting to 0-based indices.
///
/// Unlike [`parse_page_ranges`] this preserves duplicates and caller order:
/// a reordered document may legitimately repeat a page.
pub fn validate_page_order(order: &[i64], total_pages: usize) -> Result<Vec<usize>, PdfError> {
    if order.is_empty() {
        return Err(PdfError::InvalidPageNumber("empty page order".into()));
    }

    order
        .iter()
        .map(|&n| {
            if n < 1 || n as usize > total_pages {
                Err(PdfError::InvalidPageNumber(format!(
                    "{} (document has {} pages)",
                    n, total_pages
                )))
            } else {
                Ok(n as usize - 1)
            }
        })
        .collect()
}

fn parse_page_number(token: &str) -> Result<usize, PdfError> {
    let token = token.trim();
    token
        .parse::<usize>()
        .map_err(|_| PdfError::InvalidRange(format!("not a page number: {:?}", token)))
}

fn check_bounds(page: usize, total_pages: usize) -> Result<(), PdfError> {
    if page < 1 || page > total_pages {
        return Err(PdfError::InvalidRange(format!(
            "page {} out of bounds (document has {} pages)",
            page, total_pages
        )));
    }
    Ok(())
}
