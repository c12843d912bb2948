use chrono::{Local, NaiveDate};
use rand::Rng;

/// Uppercase letters and digits without the easily confused `I`, `O`, `0`, `1`.
pub const TXN_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const TXN_SUFFIX_LEN: usize = 6;
pub const DEFAULT_TXN_PREFIX: &str = "GOV";

/// Builds ids of the form `<prefix>TXN-YYYYMMDD-XXXXXX`.
#[derive(Debug, Clone)]
pub struct TransactionIdGenerator {
    prefix: String,
}

impl Default for TransactionIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_TXN_PREFIX)
    }
}

impl TransactionIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng(), Local::now().date_naive())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R, date: NaiveDate) -> String {
        let tail: String = (0..TXN_SUFFIX_LEN)
            .map(|_| TXN_ALPHABET[rng.gen_range(0..TXN_ALPHABET.len())] as char)
            .collect();
        format!("{}TXN-{}-{}", self.prefix, date.format("%Y%m%d"), tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn id_embeds_prefix_and_date() {
        let mut rng = StdRng::seed_from_u64(7);
        let date = NaiveDate::from_ymd_opt(2026, 2, 8).unwrap();
        let id = TransactionIdGenerator::default().generate_with(&mut rng, date);
        assert!(id.starts_with("GOVTXN-20260208-"), "{id}");
        assert_eq!(id.len(), "GOVTXN-20260208-".len() + TXN_SUFFIX_LEN);
    }

    #[test]
    fn suffix_avoids_ambiguous_glyphs() {
        let mut rng = StdRng::seed_from_u64(42);
        let date = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let generator = TransactionIdGenerator::new("PSK");
        for _ in 0..200 {
            let id = generator.generate_with(&mut rng, date);
            let suffix = id.rsplit('-').next().unwrap();
            assert!(suffix
                .chars()
                .all(|ch| TXN_ALPHABET.contains(&(ch as u8))));
            assert!(!suffix.contains(['I', 'O', '0', '1']));
        }
    }
}
