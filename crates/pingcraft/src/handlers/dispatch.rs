use crate::probe::{ProbeResult, Prober};
use crate::protocol::{ProbeRequest, Variant};

/// Routes validated requests to the prober path of their variant
#[derive(Clone)]
pub struct Dispatcher {
    prober: Prober,
}

impl Dispatcher {
    pub fn new(prober: Prober) -> Self {
        Self { prober }
    }

    pub async fn dispatch(&self, request: &ProbeRequest) -> ProbeResult {
        match request.variant {
            Variant::Java => self.prober.probe_java(request).await,
            Variant::Bedrock => self.prober.probe_bedrock(request).await,
        }
    }
}
