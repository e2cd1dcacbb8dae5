//! Text folding for header comparison.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Folds header text into its canonical token form.
///
/// Lower-cases, strips diacritics (Vietnamese `đ` included, which has no
/// decomposition), replaces separators with spaces and collapses whitespace.
/// Folding is idempotent.
///
/// # Examples
///
/// ```
/// use rma_map::fold_text;
///
/// assert_eq!(fold_text("  KHÁCH   HÀNG "), "khach hang");
/// assert_eq!(fold_text("Ngày_tiếp-nhận"), "ngay tiep nhan");
/// assert_eq!(fold_text("Đã sửa xong"), "da sua xong");
/// ```
pub fn fold_text(raw: &str) -> String {
    let stripped: String = raw
        .trim_matches(|ch: char| ch.is_whitespace() || ch == '\u{feff}')
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .map(|ch| if ch == 'đ' { 'd' } else { ch })
        .collect();
    stripped
        .replace(['_', '-', '.', '/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_accents() {
        assert_eq!(fold_text("Khách Hàng"), "khach hang");
        assert_eq!(fold_text("khach hang"), "khach hang");
        assert_eq!(fold_text("KHÁCH HÀNG "), "khach hang");
    }

    #[test]
    fn unifies_separators() {
        assert_eq!(fold_text("product.group"), "product group");
        assert_eq!(fold_text("S/N"), "s n");
        assert_eq!(fold_text("error__name"), "error name");
    }

    #[test]
    fn strips_byte_order_mark() {
        assert_eq!(fold_text("\u{feff}Serial"), "serial");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(fold_text("   "), "");
    }
}
