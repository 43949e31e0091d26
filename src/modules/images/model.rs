pub use campus_models::images::{
    BulkDeleteImagesDto, BulkDeleteSummary, CreateImageDto, Image, ImageDeletionSummary,
    ImageWithRelations,
};

pub use crate::modules::albums::model::ALBUM_IMAGE_FOLDER;

use uuid::Uuid;

/// Requested ids with no matching image, in request order.
pub fn missing_ids(requested: &[Uuid], found: &[Uuid]) -> Vec<Uuid> {
    let mut missing: Vec<Uuid> = requested
        .iter()
        .filter(|id| !found.contains(id))
        .copied()
        .collect();
    missing.dedup();
    missing
}
