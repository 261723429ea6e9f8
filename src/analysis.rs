//! Hebrew text normalization and tokenization.
//!
//! The same normalization is applied to analyzed fields at index-build time
//! (by [`CorpusWriter`](crate::CorpusWriter)) and to query text at search
//! time. Changing these rules requires a full index rebuild.

/// Hebrew maqaf (U+05BE), treated as a word separator.
pub(crate) const MAQAF: char = '\u{05BE}';

/// Returns true for codepoints that normalization removes entirely:
/// cantillation marks, niqud (including meteg and qamats qatan), rafe,
/// shin/sin dots, the puncta, and geresh/gershayim.
pub(crate) fn is_stripped_mark(c: char) -> bool {
    matches!(c,
        '\u{0591}'..='\u{05AF}' // teamim (cantillation)
        | '\u{05B0}'..='\u{05BD}' // niqud, incl. meteg U+05BD
        | '\u{05BF}' // rafe
        | '\u{05C1}' | '\u{05C2}' // shin/sin dots
        | '\u{05C4}' | '\u{05C5}' // upper/lower puncta
        | '\u{05C7}' // qamats qatan
        | '\u{05F3}' | '\u{05F4}' // geresh, gershayim
    )
}

/// Normalize a piece of Hebrew text for indexing or querying.
///
/// Strips the codepoints in [`is_stripped_mark`], converts maqaf to a space,
/// trims, and collapses internal whitespace to single spaces. Non-Hebrew
/// input passes through with whitespace collapsing only. Total function:
/// defined for any input, including the empty string, and idempotent.
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter_map(|c| match c {
            MAQAF => Some(' '),
            c if is_stripped_mark(c) => None,
            c => Some(c),
        })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into its non-empty tokens, in order.
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_niqud_and_teamim() {
        // Genesis 1:3 with full pointing.
        let pointed = "וַיֹּאמֶר אֱלֹהִים יְהִי אוֹר";
        assert_eq!(normalize(pointed), "ויאמר אלהים יהי אור");
    }

    #[test]
    fn strips_all_codepoints_in_mark_ranges() {
        for cp in 0x0591..=0x05AF {
            let c = char::from_u32(cp).unwrap();
            let input = format!("א{}ב", c);
            assert_eq!(normalize(&input), "אב", "U+{:04X} not stripped", cp);
        }
        for cp in [0x05B0, 0x05B7, 0x05BC, 0x05BD, 0x05C1, 0x05C2, 0x05C7] {
            let c = char::from_u32(cp).unwrap();
            let input = format!("א{}ב", c);
            assert_eq!(normalize(&input), "אב", "U+{:04X} not stripped", cp);
        }
    }

    #[test]
    fn maqaf_becomes_separator() {
        assert_eq!(normalize("על־פני"), "על פני");
    }

    #[test]
    fn gershayim_removed_inside_word() {
        assert_eq!(normalize("רש\u{05F4}י"), "רשי");
        assert_eq!(normalize("ר\u{05F3}"), "ר");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize("  בראשית \t ברא \n אלהים  "), "בראשית ברא אלהים");
    }

    #[test]
    fn non_hebrew_passes_through() {
        assert_eq!(normalize("hello   world"), "hello world");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent() {
        for s in [
            "וַיֹּאמֶר אֱלֹהִים",
            "על־פני תהום",
            "  mixed עִבְרִית and English  ",
            "",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn tokenize_splits_in_order() {
        assert_eq!(tokenize("יהי אור"), vec!["יהי", "אור"]);
        assert!(tokenize("").is_empty());
    }
}
