//! Capability set a drawing-primitives layer needs from a display.
//!
//! Shape and text code written against [`PixelSurface`] does not care
//! whether pixels land in a frame store or go straight to the bus.

/// Minimal pixel addressable surface.
pub trait PixelSurface {
    type Error;

    /// Out of range coordinates are dropped unless the surface is strict.
    fn set_pixel(&mut self, x: i32, y: i32, color: u16) -> Result<(), Self::Error>;

    /// Logical width for the current rotation.
    fn width(&self) -> u16;

    /// Logical height for the current rotation.
    fn height(&self) -> u16;

    fn set_rotation(&mut self, rotation: u8) -> Result<(), Self::Error>;

    /// Fill a rectangle clipped to the surface, pixel by pixel.
    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u16,
        h: u16,
        color: u16,
    ) -> Result<(), Self::Error> {
        let x_end = x.saturating_add(i32::from(w)).min(i32::from(self.width()));
        let y_end = y.saturating_add(i32::from(h)).min(i32::from(self.height()));
        for py in y.max(0)..y_end {
            for px in x.max(0)..x_end {
                self.set_pixel(px, py, color)?;
            }
        }
        Ok(())
    }
}
