use md5::{Digest, Md5};

/// Digest behind every published score. Changing it re-scores the whole
/// historical dataset.
pub const NPS_HASH_ALGORITHM: &str = "md5";

/// Score an encounter id on the 0-10 scale.
///
/// First byte of `md5(id)` modulo 11. A missing id is hashed as the empty
/// string so every encounter receives a score.
pub fn nps_score(consult_id: Option<&str>) -> u8 {
    let digest = Md5::digest(consult_id.unwrap_or_default().as_bytes());
    digest[0] % 11
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_match_published_values() {
        // md5("E1") = 48ed5d2d..., 0x48 = 72, 72 % 11 = 6
        assert_eq!(nps_score(Some("E1")), 6);
        // md5("E2") = 560fce20..., 0x56 = 86, 86 % 11 = 9
        assert_eq!(nps_score(Some("E2")), 9);
        // md5("enc-6") = 49262621..., 0x49 = 73, 73 % 11 = 7
        assert_eq!(nps_score(Some("enc-6")), 7);
        // md5("enc-1") = 41688a37..., 0x41 = 65, 65 % 11 = 10
        assert_eq!(nps_score(Some("enc-1")), 10);
    }

    #[test]
    fn missing_id_hashes_as_empty_string() {
        // md5("") = d41d8cd9..., 0xd4 = 212, 212 % 11 = 3
        assert_eq!(nps_score(None), 3);
        assert_eq!(nps_score(Some("")), nps_score(None));
    }
}
