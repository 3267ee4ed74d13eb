/// Operations are namespaced by where their target lives: instance templates
/// produce global operations, instance group managers zonal ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationScope {
    Global,
    Zone(String),
}

#[derive(Debug, Clone)]
pub struct WaitOperationRequest {
    pub project: String,

    pub scope: OperationScope,

    pub operation: String,
}
