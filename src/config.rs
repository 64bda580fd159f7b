/// What to do about an existence probe before `CREATE DATABASE`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProbePolicy {
    /// No probe; the result of `CREATE DATABASE` decides.
    #[default]
    Skip,
    /// Probe, and halt if the probe itself fails.
    RefuseOnError,
    /// Probe, and on failure note it and let `CREATE DATABASE` decide.
    ProceedOnError,
}

#[derive(Clone, Debug, Default)]
pub struct ApplierConfig {
    pub probe: ProbePolicy,
}

impl ApplierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probe(mut self, probe: ProbePolicy) -> Self {
        self.probe = probe;
        self
    }
}
