use super::{
    types::{CatalogueKind, Config},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - Export path and shelf are not empty
/// - Author threshold is within 0..=100
/// - The selected catalogue has its section
/// - Wise branch name is set and result count is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.wishlist.export_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "wishlist.export_path cannot be empty".to_string(),
        ));
    }

    if config.wishlist.shelf.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "wishlist.shelf cannot be empty".to_string(),
        ));
    }

    if config.matching.author_threshold > 100 {
        return Err(ConfigError::ValidationError(format!(
            "matching.author_threshold must be between 0 and 100, got {}",
            config.matching.author_threshold
        )));
    }

    match config.catalogue.kind {
        CatalogueKind::OnlineLibrary => {
            if config.catalogue.online_library.is_none() {
                return Err(ConfigError::ValidationError(
                    "catalogue.kind is \"online_library\" but [catalogue.online_library] is missing"
                        .to_string(),
                ));
            }
        }
        CatalogueKind::Wise => {
            let wise = config.catalogue.wise.as_ref().ok_or_else(|| {
                ConfigError::ValidationError(
                    "catalogue.kind is \"wise\" but [catalogue.wise] is missing".to_string(),
                )
            })?;

            if wise.branch_name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "catalogue.wise.branch_name cannot be empty".to_string(),
                ));
            }

            if wise.result_count == 0 {
                return Err(ConfigError::ValidationError(
                    "catalogue.wise.result_count cannot be 0".to_string(),
                ));
            }
        }
    }

    Ok(())
}
