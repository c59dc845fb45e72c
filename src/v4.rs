//! UUIDv4-related functionality

use crate::generator::{EntropyUnavailable, RandSource};
use crate::{Uuid, Version};

/// Generates a UUIDv4 object from the random source passed.
///
/// All the 122 bits other than the version and variant fields are filled with random bits. Use a
/// cryptographically strong source unless the output is meant for testing only.
///
/// # Errors
///
/// Returns [`EntropyUnavailable`] if `rng` fails to produce random bytes.
///
/// # Examples
///
/// ```rust
/// use uuidkit::{generator::with_rand08::Adapter, v4::generate_v4};
///
/// let uuid = generate_v4(&mut Adapter(rand::rngs::OsRng))?;
/// println!("{}", uuid); // e.g. "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
/// # Ok::<(), uuidkit::EntropyUnavailable>(())
/// ```
pub fn generate_v4<R: RandSource + ?Sized>(rng: &mut R) -> Result<Uuid, EntropyUnavailable> {
    let mut bytes = [0u8; 16];
    rng.try_fill_bytes(&mut bytes)?;
    Ok(Uuid::stamp(bytes, Version::Random))
}

#[cfg(test)]
mod tests {
    use super::generate_v4;
    use crate::generator::tests::{seeded_rng, Exhausted};
    use crate::generator::{with_rand08::Adapter, EntropyUnavailable};
    use crate::{Variant, Version};

    const N_SAMPLES: usize = 200_000;
    thread_local!(static SAMPLES: Vec<String> = {
        let mut rng = seeded_rng(0x0123_4567);
        (0..N_SAMPLES).map(|_| generate_v4(&mut rng).unwrap().into()).collect()
    });

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 200k identifiers without collision
    #[test]
    fn generates_200k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        // count '1' of each bit
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 128];
            for e in samples {
                let mut it = bins.iter_mut().rev();
                for c in e.chars().rev() {
                    if let Some(mut num) = c.to_digit(16) {
                        for _ in 0..4 {
                            *it.next().unwrap() += num & 1;
                            num >>= 1;
                        }
                    }
                }
            }
            bins
        });

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], 0, "version bit 50");
        assert_eq!(bins[51], 0, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for i in (0..48).chain(52..64).chain(66..128) {
            let p = bins[i] as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {}: {}", i, p);
        }
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        let mut rng = seeded_rng(42);
        for _ in 0..10_000 {
            let e = generate_v4(&mut rng).unwrap();
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.version(), Some(Version::Random));
        }
    }

    /// Reproduces output of seeded source
    #[test]
    fn reproduces_output_of_seeded_source() {
        let (mut a, mut b) = (seeded_rng(7), seeded_rng(7));
        for _ in 0..100 {
            assert_eq!(generate_v4(&mut a), generate_v4(&mut b));
        }
    }

    /// Returns error if random source fails
    #[test]
    fn returns_error_if_random_source_fails() {
        assert_eq!(generate_v4(&mut Adapter(Exhausted)), Err(EntropyUnavailable));
    }
}
