//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Dimensions of a variant capped at `max_width`, preserving aspect ratio.
///
/// Never upscales: a source narrower than `max_width` keeps its size.
/// Height is rounded and never drops below one pixel.
///
/// ```
/// # use quill::imaging::fit_width;
/// assert_eq!(fit_width((2000, 1500), 1000), (1000, 750));
/// assert_eq!(fit_width((300, 200), 1000), (300, 200));
/// ```
pub fn fit_width(original: (u32, u32), max_width: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    if orig_w <= max_width || orig_w == 0 {
        return original;
    }
    let ratio = max_width as f64 / orig_w as f64;
    let height = (orig_h as f64 * ratio).round().max(1.0) as u32;
    (max_width, height)
}
