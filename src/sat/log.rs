pub mod targets {
    pub const RESOLUTION: &str = "resolution";
    pub const DP: &str = "dp";
    pub const DPLL: &str = "dpll";
    pub const BOUNDED: &str = "bounded";
    pub const WORKER: &str = "worker";
    pub const EXPERIMENT: &str = "experiment";
}
