//! Integration with `rand` (v0.8) crate.

use super::{EntropyUnavailable, RandSource, StdSystemTime, V7Generator};
use rand::RngCore;

/// An adapter that implements [`RandSource`] for [`RngCore`] types.
///
/// # Examples
///
/// ```rust
/// use rand::{rngs::StdRng, SeedableRng};
/// use uuidkit::{generator::with_rand08::Adapter, v4::generate_v4};
///
/// // a seeded source makes the output reproducible in tests
/// let mut a = Adapter(StdRng::seed_from_u64(42));
/// let mut b = Adapter(StdRng::seed_from_u64(42));
/// assert_eq!(generate_v4(&mut a)?, generate_v4(&mut b)?);
/// # Ok::<(), uuidkit::EntropyUnavailable>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`RngCore`] type. */ pub T);

impl<T: RngCore> RandSource for Adapter<T> {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyUnavailable> {
        self.0.try_fill_bytes(dest).map_err(|err| {
            log::debug!("random source failed: {err}");
            EntropyUnavailable
        })
    }
}

impl<T: RngCore> V7Generator<Adapter<T>, StdSystemTime> {
    /// Creates a generator object with a specified random number generator that implements
    /// [`RngCore`] from `rand` (v0.8) crate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuidkit::V7Generator;
    ///
    /// let mut g = V7Generator::with_rand08(rand::rngs::OsRng);
    /// println!("{}", g.generate()?);
    /// # Ok::<(), uuidkit::EntropyUnavailable>(())
    /// ```
    pub const fn with_rand08(rng: T) -> Self {
        Self::new(Adapter(rng))
    }
}
