//! Colorant tints for Device-N and high bit depth subtractive pages.

use std::collections::HashMap;
use std::io;

use crate::header::{ColorSpace, MAX_CHANNELS};

const SLOTS: usize = MAX_CHANNELS as usize;

/// Key-value store persisting custom device colors between sessions.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn flush(&mut self) -> io::Result<()>;
}

/// [`PreferenceStore`] held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
    flushes: usize,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of times [`PreferenceStore::flush`] was called.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Per-colorant RGB amounts subtracted from white.
///
/// Slot `i` holds how much red, green and blue channel `i` removes at full
/// coverage. The on-screen swatch for a slot is the complement,
/// `255 - tint`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceColorTable {
    tints: [[u8; 3]; SLOTS],
}

impl Default for DeviceColorTable {
    fn default() -> Self {
        Self {
            tints: [[255; 3]; SLOTS],
        }
    }
}

impl DeviceColorTable {
    /// Built-in tints for `space`. Unlisted slots subtract everything.
    pub fn defaults(space: ColorSpace) -> Self {
        let mut table = Self::default();
        let t = &mut table.tints;
        match space {
            ColorSpace::Device(3 | 4) | ColorSpace::Cmy | ColorSpace::Cmyk => {
                t[0] = [255, 0, 0];
                t[1] = [0, 255, 0];
                t[2] = [0, 0, 255];
            }
            ColorSpace::Ymc | ColorSpace::Ymck => {
                t[0] = [0, 0, 255];
                t[1] = [0, 255, 0];
                t[2] = [255, 0, 0];
            }
            ColorSpace::Device(6) => {
                t[0] = [255, 0, 0];
                t[1] = [0, 255, 0];
                t[2] = [0, 0, 255];
                t[4] = [127, 0, 0];
                t[5] = [0, 127, 0];
            }
            ColorSpace::W | ColorSpace::Sw => {
                t[0] = [0, 0, 0];
            }
            ColorSpace::Rgb | ColorSpace::Srgb | ColorSpace::AdobeRgb => {
                t[0] = [0, 255, 255];
                t[1] = [255, 0, 255];
                t[2] = [255, 255, 0];
            }
            _ => {}
        }
        table
    }

    /// Whether tints for this page are read from and written to preferences.
    pub fn is_persisted(space: ColorSpace, bits_per_sample: u32) -> bool {
        space.is_subtractive() && bits_per_sample >= 8
    }

    /// Preference key for one slot.
    pub fn key(space: ColorSpace, index: usize) -> String {
        format!("cs{}c{}", space.tag(), index)
    }

    /// Defaults for `space`, overridden by stored values for the first
    /// `channels` slots.
    ///
    /// Entries that are missing or do not parse as three integers leave the
    /// default in place.
    pub fn load(
        space: ColorSpace,
        bits_per_sample: u32,
        channels: u32,
        store: &dyn PreferenceStore,
    ) -> Self {
        let mut table = Self::defaults(space);
        if !Self::is_persisted(space, bits_per_sample) {
            return table;
        }
        for index in 0..(channels as usize).min(SLOTS) {
            let key = Self::key(space, index);
            let Some(value) = store.get(&key) else {
                continue;
            };
            match parse_triple(&value) {
                Some(rgb) => table.tints[index] = rgb,
                None => log::warn!("ignoring device color {key} = {value:?}"),
            }
        }
        table
    }

    /// Write the first `channels` slots and flush the store.
    ///
    /// Does nothing for spaces that are not persisted.
    pub fn save(
        &self,
        space: ColorSpace,
        bits_per_sample: u32,
        channels: u32,
        store: &mut dyn PreferenceStore,
    ) -> io::Result<()> {
        if !Self::is_persisted(space, bits_per_sample) {
            return Ok(());
        }
        for (index, [r, g, b]) in self.tints.iter().take(channels as usize).enumerate() {
            store.set(&Self::key(space, index), &format!("{r} {g} {b}"));
        }
        store.flush()
    }

    pub fn tint(&self, index: usize) -> Option<[u8; 3]> {
        self.tints.get(index).copied()
    }

    pub fn set_tint(&mut self, index: usize, rgb: [u8; 3]) -> bool {
        match self.tints.get_mut(index) {
            Some(slot) => {
                *slot = rgb;
                true
            }
            None => false,
        }
    }

    /// Swatch color shown for a slot.
    pub fn display_color(&self, index: usize) -> Option<[u8; 3]> {
        self.tint(index).map(|t| t.map(|c| 255 - c))
    }

    /// Set a slot from a picked swatch color.
    pub fn set_display_color(&mut self, index: usize, rgb: [u8; 3]) -> bool {
        self.set_tint(index, rgb.map(|c| 255 - c))
    }

    pub(crate) fn tints(&self) -> &[[u8; 3]; SLOTS] {
        &self.tints
    }
}

fn parse_triple(value: &str) -> Option<[u8; 3]> {
    let mut parts = value.split_whitespace().map(|p| p.parse::<u8>().ok());
    let rgb = [parts.next()??, parts.next()??, parts.next()??];
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmy_family_defaults() {
        let t = DeviceColorTable::defaults(ColorSpace::Cmyk);
        assert_eq!(t.tint(0), Some([255, 0, 0]));
        assert_eq!(t.tint(1), Some([0, 255, 0]));
        assert_eq!(t.tint(2), Some([0, 0, 255]));
        assert_eq!(t.tint(3), Some([255, 255, 255]));
        assert_eq!(t.tint(14), Some([255, 255, 255]));
        assert_eq!(t.tint(15), None);

        let t = DeviceColorTable::defaults(ColorSpace::Ymck);
        assert_eq!(t.tint(0), Some([0, 0, 255]));
        assert_eq!(t.tint(2), Some([255, 0, 0]));

        let t = DeviceColorTable::defaults(ColorSpace::Device(6));
        assert_eq!(t.tint(3), Some([255, 255, 255]));
        assert_eq!(t.tint(4), Some([127, 0, 0]));
        assert_eq!(t.tint(5), Some([0, 127, 0]));
    }

    #[test]
    fn display_color_is_complement() {
        let mut t = DeviceColorTable::defaults(ColorSpace::Cmy);
        assert_eq!(t.display_color(0), Some([0, 255, 255]));
        assert!(t.set_display_color(3, [255, 128, 0]));
        assert_eq!(t.tint(3), Some([0, 127, 255]));
        assert!(!t.set_display_color(15, [0, 0, 0]));
    }

    #[test]
    fn load_overrides_parsed_slots_only() {
        let mut prefs = MemoryPreferences::new();
        prefs.set("cs6c0", "10 20 30");
        prefs.set("cs6c1", "garbage");
        prefs.set("cs6c2", "1 2");
        prefs.set("cs6c3", "300 0 0");
        let t = DeviceColorTable::load(ColorSpace::Cmyk, 8, 4, &prefs);
        assert_eq!(t.tint(0), Some([10, 20, 30]));
        assert_eq!(t.tint(1), Some([0, 255, 0]));
        assert_eq!(t.tint(2), Some([0, 0, 255]));
        assert_eq!(t.tint(3), Some([255, 255, 255]));
    }

    #[test]
    fn load_skipped_below_eight_bits() {
        let mut prefs = MemoryPreferences::new();
        prefs.set("cs6c0", "10 20 30");
        let t = DeviceColorTable::load(ColorSpace::Cmyk, 4, 4, &prefs);
        assert_eq!(t, DeviceColorTable::defaults(ColorSpace::Cmyk));
    }

    #[test]
    fn save_then_load() {
        let mut prefs = MemoryPreferences::new();
        let mut t = DeviceColorTable::defaults(ColorSpace::Device(2));
        t.set_tint(1, [1, 2, 3]);
        t.save(ColorSpace::Device(2), 16, 2, &mut prefs).unwrap();
        assert_eq!(prefs.len(), 2);
        assert_eq!(prefs.flush_count(), 1);
        assert_eq!(prefs.get("cs49c1").as_deref(), Some("1 2 3"));

        let loaded = DeviceColorTable::load(ColorSpace::Device(2), 16, 2, &prefs);
        assert_eq!(loaded, t);
    }

    #[test]
    fn save_is_noop_for_additive() {
        let mut prefs = MemoryPreferences::new();
        DeviceColorTable::defaults(ColorSpace::Rgb)
            .save(ColorSpace::Rgb, 8, 3, &mut prefs)
            .unwrap();
        assert!(prefs.is_empty());
        assert_eq!(prefs.flush_count(), 0);
    }
}
