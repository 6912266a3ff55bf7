// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// Color type for visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// White color.
    pub const WHITE: Color = Color(255, 255, 255);
    /// Black color.
    pub const BLACK: Color = Color(0, 0, 0);
    /// Face outline (#99ffff).
    pub const FACE: Color = Color(0x99, 0xFF, 0xFF);
    /// Arms (#99ccff).
    pub const ARM: Color = Color(0x99, 0xCC, 0xFF);
    /// Legs (#9999ff).
    pub const LEG: Color = Color(0x99, 0x99, 0xFF);
    /// Torso (#9900ff).
    pub const TORSO: Color = Color(0x99, 0x00, 0xFF);

    /// Channels as an array, for use with `image::Rgb`.
    pub const fn to_array(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}
