//! CLI command implementations.

pub mod map;
pub mod sync;

use crate::cli::types::MappingArgs;
use crate::domain::models::IdentityMappingConfig;

/// Overlay command-line mapping flags on the configured mapping. Flags that
/// were not given leave the configured value in place; replacements given on
/// the command line replace the configured list as a whole.
pub(crate) fn apply_mapping_overrides(mapping: &mut IdentityMappingConfig, args: &MappingArgs) {
    if let Some(prepend) = &args.email_prepend {
        mapping.prepend.clone_from(prepend);
    }
    if let Some(append) = &args.email_append {
        mapping.append.clone_from(append);
    }
    if !args.email_replacements.is_empty() {
        mapping.replacements.clone_from(&args.email_replacements);
    }
}
