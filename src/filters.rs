//! Custom askama filters.

use std::fmt::Display;

/// Up to two uppercase initials, used for staff avatars without a photo.
pub fn initials<T: Display>(value: T) -> askama::Result<String> {
    let name = value.to_string();
    let initials: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .collect();
    Ok(initials.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::initials;

    #[test]
    fn takes_first_letters_of_first_two_words() {
        assert_eq!(initials("Emma Johnson").unwrap(), "EJ");
        assert_eq!(initials("Sofia Isabel Rodriguez").unwrap(), "SI");
        assert_eq!(initials("cher").unwrap(), "C");
        assert_eq!(initials("").unwrap(), "");
    }
}
