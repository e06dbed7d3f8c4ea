use std::collections::HashSet;

/// Allocate the next task code for a project given every code it currently has.
///
/// Numbering is based on the historical maximum, not the row count: codes
/// matching `T<digits>` (case-insensitive) are scanned for the largest suffix,
/// and the new code is that maximum plus one, zero-padded to three digits.
/// Deleting the highest-numbered task and creating a new one therefore yields
/// a strictly larger code, never a reused one.
pub fn next_task_code(existing: &[String]) -> String {
    let max = existing
        .iter()
        .filter_map(|c| code_number(c))
        .max()
        .unwrap_or(0);

    let taken: HashSet<String> = existing.iter().map(|c| c.to_uppercase()).collect();

    // Collision with an existing code should be impossible after the max
    // scan; bump past it anyway.
    let mut n = max + 1;
    loop {
        let code = format!("T{n:03}");
        if !taken.contains(&code) {
            return code;
        }
        n += 1;
    }
}

/// Numeric suffix of a `T<digits>` code, case-insensitive. Codes in any other
/// shape do not participate in numbering.
pub fn code_number(code: &str) -> Option<u64> {
    let rest = code
        .trim()
        .strip_prefix('T')
        .or_else(|| code.trim().strip_prefix('t'))?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_code() {
        assert_eq!(next_task_code(&[]), "T001");
    }

    #[test]
    fn test_sequential() {
        assert_eq!(next_task_code(&codes(&["T001", "T002"])), "T003");
    }

    #[test]
    fn test_survives_deletion() {
        // T001 deleted: numbering continues from the historical max.
        assert_eq!(next_task_code(&codes(&["T002", "T003"])), "T004");
    }

    #[test]
    fn test_gap_below_max_not_reused() {
        assert_eq!(next_task_code(&codes(&["T001", "T005"])), "T006");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(next_task_code(&codes(&["t004"])), "T005");
    }

    #[test]
    fn test_ignores_foreign_codes() {
        assert_eq!(next_task_code(&codes(&["TASK-9", "X001", "T02X", "T002"])), "T003");
    }

    #[test]
    fn test_grows_past_three_digits() {
        assert_eq!(next_task_code(&codes(&["T999"])), "T1000");
    }

    #[test]
    fn test_code_number() {
        assert_eq!(code_number("T010"), Some(10));
        assert_eq!(code_number("t7"), Some(7));
        assert_eq!(code_number("T"), None);
        assert_eq!(code_number("T1a"), None);
        assert_eq!(code_number("U001"), None);
    }
}
