use metrics_exporter_prometheus::PrometheusHandle;
use scheme_finder::config::KnowledgeBaseConfig;
use scheme_finder::eligibility::{EligibilityEngine, Profile};
use scheme_finder::error::AppError;
use scheme_finder::knowledge_base::KnowledgeBase;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the configured catalogue, or the bundled one when no path is set.
pub(crate) fn load_knowledge_base(config: &KnowledgeBaseConfig) -> Result<KnowledgeBase, AppError> {
    let knowledge_base = match &config.schemes_path {
        Some(path) => KnowledgeBase::from_path(path)?,
        None => {
            let knowledge_base = KnowledgeBase::bundled()?;
            info!(schemes = knowledge_base.len(), "bundled scheme catalogue loaded");
            knowledge_base
        }
    };
    Ok(knowledge_base)
}

pub(crate) fn build_engine(config: &KnowledgeBaseConfig) -> Result<Arc<EligibilityEngine>, AppError> {
    let knowledge_base = load_knowledge_base(config)?;
    Ok(Arc::new(EligibilityEngine::new(Arc::new(knowledge_base))))
}

/// Reads and validates a profile JSON object from disk.
pub(crate) fn read_profile(path: &Path) -> Result<Profile, AppError> {
    let reader = BufReader::new(File::open(path)?);
    let profile: Profile = serde_json::from_reader(reader)?;
    profile.validate()?;
    Ok(profile)
}
