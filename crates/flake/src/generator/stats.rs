/// A point-in-time snapshot of a generator's health.
///
/// The snapshot is taken under the generator's lock, so the counters are
/// never torn, but it is stale as soon as it is returned. All times are
/// milliseconds since the Unix epoch.
///
/// With the `serde` feature the fields serialize as `Timestamp`,
/// `GeneratedIds`, `Errors`, `MaxTime` and `WorkerId`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Stats {
    /// Clock reading at the time of the snapshot.
    pub timestamp: u64,
    /// Number of IDs handed out successfully.
    pub generated_ids: u64,
    /// Number of failed `generate` calls, of any kind.
    pub errors: u64,
    /// The last accepted timestamp.
    pub max_time: u64,
    /// The worker id embedded in every ID.
    pub worker_id: u64,
}
