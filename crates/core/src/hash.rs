//! The custom 32-bit label hash (`BinHash` in the game's own tooling).

/// Hashes a label the same way the game's string table does.
///
/// `bin_hash("")` is `0`. Otherwise the first code unit seeds the
/// accumulator (`s[0] - 33`, wrapping in `u32` if `s[0] < 33`), and every
/// following code point is folded in as `h = h * 33 + c`, wrapping modulo
/// 2^32. Labels are ASCII in practice, but the fold operates on `char`s so a
/// label containing non-ASCII code points still hashes deterministically.
pub fn bin_hash(s: &str) -> u32 {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return 0;
    };

    let mut h = (first as u32).wrapping_sub(33);
    for c in chars {
        h = h.wrapping_mul(33).wrapping_add(c as u32);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_hashes_to_zero() {
        assert_eq!(bin_hash(""), 0);
    }

    #[test]
    fn single_ascii_char() {
        // 'A' is 65, 65 - 33 = 32.
        assert_eq!(bin_hash("A"), 32);
    }

    #[test]
    fn matches_worked_example() {
        // h0 = 'H' - 33 = 72 - 33 = 39
        // h1 = 39*33 + 'E' = 1287 + 69 = 1356
        // h2 = 1356*33 + 'L' = 44748 + 76 = 44824
        // h3 = 44824*33 + 'L' = 1479192 + 76 = 1479268
        // h4 = 1479268*33 + 'O' = 48815844 + 79 = 48815923
        assert_eq!(bin_hash("HELLO"), 48815923);
    }

    #[test]
    fn first_char_below_33_wraps() {
        // '\0' - 33 wraps around in u32 arithmetic instead of panicking.
        let h = bin_hash("\0X");
        assert_eq!(h, (0u32.wrapping_sub(33)).wrapping_mul(33).wrapping_add('X' as u32));
    }

    #[test]
    fn distinct_labels_rarely_collide() {
        let labels = [
            "UI_MENU_START", "UI_MENU_QUIT", "UI_MENU_OPTIONS", "CAR_NAME_FERRARI",
            "CAR_NAME_LAMBORGHINI", "RACE_RESULT_WIN", "RACE_RESULT_LOSE", "HUD_SPEED",
            "HUD_LAP", "ONLINE_CONNECTING",
        ];
        let mut hashes = std::collections::HashSet::new();
        for label in labels {
            assert!(hashes.insert(bin_hash(label)), "collision for {label}");
        }
    }

    #[test]
    fn equal_labels_hash_equal() {
        assert_eq!(bin_hash("SAME_LABEL"), bin_hash("SAME_LABEL"));
    }
}
