use crate::domain::DeliveryPlan;

/// Platform-imposed byte thresholds for the video delivery tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeLimits {
    /// Largest video the platform will fetch by URL itself.
    pub download_limit: u64,
    /// Largest file the bot may upload.
    pub upload_limit: u64,
}

/// Pick the delivery tier for a video of `size_bytes`.
///
/// Boundaries are inclusive on both thresholds.
pub fn plan_video(size_bytes: u64, limits: SizeLimits) -> DeliveryPlan {
    if size_bytes <= limits.download_limit {
        DeliveryPlan::StreamByUrl
    } else if size_bytes <= limits.upload_limit {
        DeliveryPlan::ReuploadFile
    } else {
        DeliveryPlan::LinkOnly
    }
}
