//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::Uuid;
use inner::GlobalGenInner;

/// Returns the lock handle of process-wide global generator, creating one if none exists.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(|| sync::Mutex::new(GlobalGenInner::new()))
        .lock()
        .expect("uuidkit: could not lock global generator")
}

/// Generates a UUIDv7 object.
///
/// This function employs a global generator and guarantees the process-wide monotonic order of
/// UUIDs generated within the same millisecond. On Unix, this function resets the generator when
/// the process ID changes (i.e., upon process forks) to prevent collisions across processes.
///
/// The global generator is created on first use and lives until the process exits.
///
/// # Panics
///
/// Panics if the operating system fails to seed the global generator.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidkit::uuid7();
/// println!("{}", uuid); // e.g., "01809424-3e59-7c05-9219-566f82fff672"
/// println!("{:?}", uuid.as_bytes()); // as 16-byte big-endian array
///
/// let uuid_string: String = uuidkit::uuid7().to_string();
/// ```
pub fn uuid7() -> Uuid {
    lock_global_gen()
        .get_mut()
        .v7
        .generate()
        .expect("uuidkit: global random source failed")
}

/// Generates a UUIDv4 object.
///
/// # Panics
///
/// Panics if the operating system fails to seed the global generator.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidkit::uuid4();
/// println!("{}", uuid); // e.g., "2ca4b2ce-6c13-40d4-bccf-37d222820f6f"
/// ```
pub fn uuid4() -> Uuid {
    lock_global_gen()
        .get_mut()
        .v7
        .generate_v4()
        .expect("uuidkit: global random source failed")
}

/// Generates a UUIDv1 object.
///
/// The node identifier is the hardware address of the host if one is found, or a random value
/// with the multicast bit set otherwise. UUIDv1 and UUIDv6 values generated by this function and
/// [`uuid6`] share one clock sequence.
///
/// # Panics
///
/// Panics if the operating system fails to seed the global generator.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidkit::uuid1();
/// println!("{}", uuid); // e.g., "c232ab00-9414-11ec-b3c8-9f6bdeced846"
/// ```
pub fn uuid1() -> Uuid {
    lock_global_gen().get_mut().time_based.generate_v1()
}

/// Generates a UUIDv6 object.
///
/// See [`uuid1`] for the node identifier and the clock sequence.
///
/// # Panics
///
/// Panics if the operating system fails to seed the global generator.
///
/// # Examples
///
/// ```rust
/// let uuid = uuidkit::uuid6();
/// println!("{}", uuid); // e.g., "1ec9414c-232a-6b00-b3c8-9f6bdeced846"
/// ```
pub fn uuid6() -> Uuid {
    lock_global_gen().get_mut().time_based.generate_v6()
}

mod inner {
    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Core;

    use crate::generator::{with_rand08::Adapter, TimeBasedGenerator, V7Generator};
    use crate::NodeId;

    /// The type alias for the random number generator of the global generator.
    ///
    /// The global generator currently employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to
    /// emulate the strategy used by [`rand::rngs::ThreadRng`].
    pub type GlobalGenRng = Adapter<ReseedingRng<ChaCha12Core, OsRng>>;

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        pub v7: V7Generator<GlobalGenRng>,
        pub time_based: TimeBasedGenerator,
    }

    impl GlobalGenInner {
        pub fn new() -> Self {
            let core = ChaCha12Core::from_rng(OsRng)
                .expect("uuidkit: could not initialize global generator");
            let mut rng = Adapter(ReseedingRng::new(core, 1024 * 64, OsRng));
            let node = NodeId::host_or_random(&mut rng)
                .expect("uuidkit: could not initialize global generator");
            let time_based = TimeBasedGenerator::new(node, &mut rng)
                .expect("uuidkit: could not initialize global generator");
            log::trace!("initialized global generator with node id {node}");
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                v7: V7Generator::new(rng),
                time_based,
            }
        }

        /// Returns a mutable reference to the inner generators, reseting their state on Unix if
        /// the process ID has changed.
        pub fn get_mut(&mut self) -> &mut Self {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                log::debug!("process ID changed from {}; resetting global generator", self.pid);
                *self = Self::new();
            }
            self
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{uuid1, uuid4, uuid6, uuid7};
    use crate::{Fields, Variant, Version};
    use std::{collections::HashSet, sync::mpsc, thread, time};

    /// Returns the value of each version from the matching function
    #[test]
    fn returns_the_value_of_each_version_from_the_matching_function() {
        let cases: [(fn() -> crate::Uuid, Version); 4] = [
            (uuid1, Version::TimeBased),
            (uuid4, Version::Random),
            (uuid6, Version::ReorderedTimeBased),
            (uuid7, Version::UnixTimeBased),
        ];
        for (f, version) in cases {
            for _ in 0..1_000 {
                let e = f();
                assert_eq!(e.variant(), Variant::Var10);
                assert_eq!(e.version(), Some(version));
            }
        }
    }

    /// Keeps UUIDv7 order when UUIDv4 draws from the same generator
    #[test]
    fn keeps_uuidv7_order_when_uuidv4_draws_from_the_same_generator() {
        let mut prev = uuid7();
        for _ in 0..10_000 {
            let v4 = uuid4();
            assert_eq!(v4.version(), Some(Version::Random));
            let curr = uuid7();
            assert!(prev < curr);
            prev = curr;
        }
    }

    /// Encodes up-to-date timestamps
    #[test]
    fn encodes_up_to_date_timestamps() {
        for _ in 0..1_000 {
            let before = time::SystemTime::now();
            let (v6, v7) = (uuid6(), uuid7());
            let (Fields::V6(f6), Fields::V7(f7)) = (v6.fields(), v7.fields()) else {
                panic!("unexpected fields: {:?} {:?}", v6, v7);
            };
            for t in [f6.unix_time().unwrap(), f7.unix_time()] {
                let lag = before.duration_since(t).unwrap_or_default();
                assert!(lag < time::Duration::from_millis(16));
            }
        }
    }

    /// Shares one node id and clock sequence between UUIDv1 and UUIDv6
    #[test]
    fn shares_one_node_id_and_clock_sequence_between_uuidv1_and_uuidv6() {
        let triple = |e: crate::Uuid| match e.fields() {
            Fields::V1(f) | Fields::V6(f) => (f.timestamp(), f.clock_seq(), f.node()),
            other => panic!("unexpected fields: {:?}", other),
        };

        let mut seen = HashSet::new();
        let node = triple(uuid1()).2;
        for _ in 0..10_000 {
            for e in [uuid1(), uuid6()] {
                let t = triple(e);
                assert_eq!(t.2, node);
                assert!(seen.insert(t));
            }
        }
    }

    /// Generates no IDs sharing same timestamp and counters under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_counters_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (tx, rx) = mpsc::channel();
        for i in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        let e = if i % 2 == 0 { uuid7() } else { uuid6() };
                        tx.send(e).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            // timestamp and counter of UUIDv7, or timestamp and clock sequence of UUIDv6
            s.insert(<[u8; 12]>::try_from(&e.as_bytes()[..12]).unwrap());
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}
