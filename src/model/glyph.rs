use std::path::PathBuf;

/// First code point of the Unicode Private Use Area.
pub const PUA_START: u32 = 0xE000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphEntry {
    pub name: String,
    pub code_point: u32,
    pub source: PathBuf,
}

impl GlyphEntry {
    pub fn as_char(&self) -> Option<char> {
        char::from_u32(self.code_point)
    }
}

/// Glyph names and the code points they were assigned, in assignment order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphCatalog {
    entries: Vec<GlyphEntry>,
}

impl GlyphCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a glyph at the next free code point and returns that code point.
    pub fn push(&mut self, name: String, source: PathBuf) -> u32 {
        let code_point = PUA_START + self.entries.len() as u32;
        self.entries.push(GlyphEntry {
            name,
            code_point,
            source,
        });
        code_point
    }

    pub fn get(&self, name: &str) -> Option<&GlyphEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[GlyphEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlyphEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
