//! Display collaborator

/// The part of the host display the browser draws on
pub trait Screen {
    /// Active mode as (width, height) in pixels
    fn resolution(&self) -> (u32, u32);

    fn clear(&mut self);

    /// Append one text row
    fn put_line(&mut self, text: &str);

    /// Show a one-off message such as an error
    fn notify(&mut self, message: &str);
}

/// Whether the screen is at least `min` in both dimensions
pub fn meets_resolution(screen: &dyn Screen, min: (u32, u32)) -> bool {
    let (width, height) = screen.resolution();
    width >= min.0 && height >= min.1
}
