// Compiles icon glyphs into a TrueType font with write-fonts

use anyhow::{Result, anyhow};
use kurbo::{BezPath, PathEl};
use std::fmt::Debug;
use write_fonts::FontBuilder;
use write_fonts::tables::cmap::Cmap;
use write_fonts::tables::glyf::{GlyfLocaBuilder, Glyph as GlyfGlyph, SimpleGlyph};
use write_fonts::tables::head::Head;
use write_fonts::tables::hhea::Hhea;
use write_fonts::tables::hmtx::{Hmtx, LongMetric};
use write_fonts::tables::loca::LocaFormat;
use write_fonts::tables::maxp::Maxp;
use write_fonts::tables::name::{Name, NameRecord};
use write_fonts::tables::os2::Os2;
use write_fonts::tables::post::Post;
use write_fonts::types::{FWord, Fixed, GlyphId, NameId, Tag, UfWord};

const PLATFORM_WINDOWS: u16 = 3;
const ENCODING_UNICODE_BMP: u16 = 1;
const LANGUAGE_EN_US: u16 = 0x0409;
const VERSION_STRING: &str = "Version 1.0";

/// Naming and vertical metrics shared by every glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontInfo {
    pub family_name: String,
    pub full_name: String,
    pub postscript_name: String,
    pub units_per_em: u16,
    pub ascent: i16,
    pub descent: i16,
}

#[derive(Clone, Debug)]
pub struct Glyph {
    /// `None` for `.notdef`.
    pub code_point: Option<u32>,
    pub advance_width: u16,
    /// Closed quadratic outline in font units.
    pub outline: BezPath,
}

impl Glyph {
    pub fn ps_name(&self) -> String {
        match self.code_point {
            Some(cp) if cp <= 0xFFFF => format!("uni{:04X}", cp),
            Some(cp) => format!("u{:X}", cp),
            None => ".notdef".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Extent {
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
}

impl Extent {
    fn union(self, other: Extent) -> Extent {
        Extent {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

struct CompiledGlyph {
    glyph: GlyfGlyph,
    extent: Option<Extent>,
    points: u16,
    contours: u16,
}

fn compile_error(what: &str, e: impl Debug) -> anyhow::Error {
    anyhow!("Failed to compile {}: {:?}", what, e)
}

fn compile_glyph(glyph: &Glyph) -> Result<CompiledGlyph> {
    let mut points = 0u16;
    let mut contours = 0u16;
    for el in glyph.outline.elements() {
        match el {
            PathEl::MoveTo(_) => {
                contours = contours.saturating_add(1);
                points = points.saturating_add(1);
            }
            PathEl::LineTo(_) => points = points.saturating_add(1),
            PathEl::QuadTo(..) => points = points.saturating_add(2),
            PathEl::CurveTo(..) => points = points.saturating_add(3),
            PathEl::ClosePath => {}
        }
    }

    if contours == 0 {
        return Ok(CompiledGlyph {
            glyph: GlyfGlyph::Empty,
            extent: None,
            points: 0,
            contours: 0,
        });
    }

    let simple = SimpleGlyph::from_bezpath(&glyph.outline)
        .map_err(|e| compile_error("glyph outline", e))?;
    let extent = Extent {
        x_min: simple.bbox.x_min,
        y_min: simple.bbox.y_min,
        x_max: simple.bbox.x_max,
        y_max: simple.bbox.y_max,
    };
    Ok(CompiledGlyph {
        glyph: GlyfGlyph::Simple(simple),
        extent: Some(extent),
        points,
        contours,
    })
}

fn name_table(info: &FontInfo) -> Name {
    let unique_id = format!("{};{}", VERSION_STRING, info.postscript_name);
    let records = [
        (NameId::FAMILY_NAME, info.family_name.as_str()),
        (NameId::SUBFAMILY_NAME, "Regular"),
        (NameId::UNIQUE_ID, unique_id.as_str()),
        (NameId::FULL_NAME, info.full_name.as_str()),
        (NameId::VERSION_STRING, VERSION_STRING),
        (NameId::POSTSCRIPT_NAME, info.postscript_name.as_str()),
    ]
    .into_iter()
    .map(|(id, value)| {
        NameRecord::new(
            PLATFORM_WINDOWS,
            ENCODING_UNICODE_BMP,
            LANGUAGE_EN_US,
            id,
            value.to_string().into(),
        )
    });
    Name::new(records.collect())
}

/// Serializes `glyphs` (glyph 0 first) into a complete TrueType font.
pub fn to_ttf(info: &FontInfo, glyphs: &[Glyph]) -> Result<Vec<u8>> {
    let num_glyphs = u16::try_from(glyphs.len())
        .map_err(|_| anyhow!("Too many glyphs for one font: {}", glyphs.len()))?;

    let mut glyf_loca = GlyfLocaBuilder::new();
    let mut metrics = Vec::with_capacity(glyphs.len());
    let mut mappings = Vec::new();
    let mut font_extent: Option<Extent> = None;
    let mut max_points = 0u16;
    let mut max_contours = 0u16;
    let mut advance_width_max = 0u16;
    let mut min_lsb = i16::MAX;
    let mut min_rsb = i16::MAX;
    let mut x_max_extent = i16::MIN;

    for (gid, glyph) in glyphs.iter().enumerate() {
        let compiled = compile_glyph(glyph)?;
        glyf_loca
            .add_glyph(&compiled.glyph)
            .map_err(|e| compile_error("glyf", e))?;

        let lsb = compiled.extent.map_or(0, |e| e.x_min);
        metrics.push(LongMetric::new(glyph.advance_width, lsb));
        advance_width_max = advance_width_max.max(glyph.advance_width);
        max_points = max_points.max(compiled.points);
        max_contours = max_contours.max(compiled.contours);

        if let Some(extent) = compiled.extent {
            let rsb = glyph.advance_width as i32 - extent.x_max as i32;
            min_lsb = min_lsb.min(extent.x_min);
            min_rsb = min_rsb.min(rsb.clamp(i16::MIN as i32, i16::MAX as i32) as i16);
            x_max_extent = x_max_extent.max(extent.x_max);
            font_extent = Some(font_extent.map_or(extent, |f| f.union(extent)));
        }

        if let Some(cp) = glyph.code_point {
            let ch = char::from_u32(cp)
                .ok_or_else(|| anyhow!("Invalid code point U+{:04X}", cp))?;
            mappings.push((ch, GlyphId::new(gid as u32)));
        }
    }

    if font_extent.is_none() {
        min_lsb = 0;
        min_rsb = 0;
        x_max_extent = 0;
    }
    let bbox = font_extent.unwrap_or_default();
    let (glyf, loca, loca_format) = glyf_loca.build();

    let head = Head {
        font_revision: Fixed::from_f64(1.0),
        units_per_em: info.units_per_em,
        x_min: bbox.x_min,
        y_min: bbox.y_min,
        x_max: bbox.x_max,
        y_max: bbox.y_max,
        lowest_rec_ppem: 8,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
        ..Default::default()
    };

    let hhea = Hhea::new(
        FWord::new(info.ascent),
        FWord::new(-info.descent),
        FWord::new(0),
        UfWord::new(advance_width_max),
        FWord::new(min_lsb),
        FWord::new(min_rsb),
        FWord::new(x_max_extent),
        1,
        0,
        0,
        num_glyphs,
    );
    let hmtx = Hmtx::new(metrics, Vec::new());

    let maxp = Maxp {
        num_glyphs,
        max_points: Some(max_points),
        max_contours: Some(max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(2),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };

    let first_char = mappings.first().map_or(0, |(c, _)| (*c as u32).min(0xFFFF) as u16);
    let last_char = mappings.last().map_or(0, |(c, _)| (*c as u32).min(0xFFFF) as u16);
    let ascent = info.ascent.max(0) as u16;
    let descent = info.descent.max(0) as u16;
    let os2 = Os2 {
        x_avg_char_width: advance_width_max as i16,
        us_weight_class: 400,
        us_width_class: 5,
        ach_vend_id: Tag::new(b"NONE"),
        us_first_char_index: first_char,
        us_last_char_index: last_char,
        s_typo_ascender: info.ascent,
        s_typo_descender: -info.descent,
        s_typo_line_gap: 0,
        us_win_ascent: ascent.max(bbox.y_max.max(0) as u16),
        us_win_descent: descent.max(bbox.y_min.min(0).unsigned_abs()),
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(0),
        s_cap_height: Some(0),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        ..Default::default()
    };

    let names: Vec<String> = glyphs.iter().map(Glyph::ps_name).collect();
    let mut post = Post::new_v2(names.iter().map(String::as_str));
    post.underline_position = FWord::new(-100);
    post.underline_thickness = FWord::new(50);

    let cmap = Cmap::from_mappings(mappings).map_err(|e| compile_error("cmap", e))?;

    let mut builder = FontBuilder::new();
    builder.add_table(&head).map_err(|e| compile_error("head", e))?;
    builder.add_table(&hhea).map_err(|e| compile_error("hhea", e))?;
    builder.add_table(&maxp).map_err(|e| compile_error("maxp", e))?;
    builder.add_table(&os2).map_err(|e| compile_error("OS/2", e))?;
    builder.add_table(&hmtx).map_err(|e| compile_error("hmtx", e))?;
    builder.add_table(&cmap).map_err(|e| compile_error("cmap", e))?;
    builder.add_table(&loca).map_err(|e| compile_error("loca", e))?;
    builder.add_table(&glyf).map_err(|e| compile_error("glyf", e))?;
    builder.add_table(&name_table(info)).map_err(|e| compile_error("name", e))?;
    builder.add_table(&post).map_err(|e| compile_error("post", e))?;
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Shape};

    fn info() -> FontInfo {
        FontInfo {
            family_name: "icons".to_string(),
            full_name: "icons".to_string(),
            postscript_name: "icons".to_string(),
            units_per_em: 1000,
            ascent: 800,
            descent: 200,
        }
    }

    fn notdef() -> Glyph {
        Glyph {
            code_point: None,
            advance_width: 1000,
            outline: BezPath::new(),
        }
    }

    fn square(code_point: u32) -> Glyph {
        Glyph {
            code_point: Some(code_point),
            advance_width: 1000,
            outline: Rect::new(100.0, 0.0, 900.0, 700.0).to_path(0.1),
        }
    }

    #[test]
    fn test_parses_back_with_expected_metrics() {
        let font = to_ttf(&info(), &[notdef(), square(0xE000), square(0xE001)]).unwrap();
        let face = ttf_parser::Face::parse(&font, 0).unwrap();

        assert_eq!(face.units_per_em(), 1000);
        assert_eq!(face.number_of_glyphs(), 3);
        assert_eq!(face.ascender(), 800);
        assert_eq!(face.descender(), -200);

        let gid = face.glyph_index('\u{E001}').unwrap();
        assert_eq!(gid.0, 2);
        assert_eq!(face.glyph_hor_advance(gid), Some(1000));
        assert_eq!(face.glyph_hor_side_bearing(gid), Some(100));

        let bbox = face.glyph_bounding_box(gid).unwrap();
        assert_eq!((bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max), (100, 0, 900, 700));
        assert!(face.glyph_index('\u{E002}').is_none());
    }

    #[test]
    fn test_notdef_is_empty_with_full_advance() {
        let font = to_ttf(&info(), &[notdef()]).unwrap();
        let face = ttf_parser::Face::parse(&font, 0).unwrap();

        let notdef = ttf_parser::GlyphId(0);
        assert_eq!(face.number_of_glyphs(), 1);
        assert_eq!(face.glyph_hor_advance(notdef), Some(1000));
        assert!(face.glyph_bounding_box(notdef).is_none());
    }

    #[test]
    fn test_glyph_names_follow_code_points() {
        let font = to_ttf(&info(), &[notdef(), square(0xE000)]).unwrap();
        let face = ttf_parser::Face::parse(&font, 0).unwrap();

        assert_eq!(face.glyph_name(ttf_parser::GlyphId(0)), Some(".notdef"));
        assert_eq!(face.glyph_name(ttf_parser::GlyphId(1)), Some("uniE000"));
    }

    #[test]
    fn test_non_contiguous_code_points_are_mapped() {
        let font = to_ttf(&info(), &[notdef(), square(0xE000), square(0xE005)]).unwrap();
        let face = ttf_parser::Face::parse(&font, 0).unwrap();

        assert_eq!(face.glyph_index('\u{E000}').map(|g| g.0), Some(1));
        assert_eq!(face.glyph_index('\u{E005}').map(|g| g.0), Some(2));
        assert!(face.glyph_index('\u{E001}').is_none());
    }

    #[test]
    fn test_code_point_outside_bmp_is_mapped() {
        let font = to_ttf(&info(), &[notdef(), square(0xF_0000)]).unwrap();
        let face = ttf_parser::Face::parse(&font, 0).unwrap();
        assert_eq!(face.glyph_index('\u{F0000}').map(|g| g.0), Some(1));
    }

    #[test]
    fn test_surrogate_code_point_is_rejected() {
        assert!(to_ttf(&info(), &[notdef(), square(0xD800)]).is_err());
    }

    #[test]
    fn test_long_names_are_stored_whole() {
        // two copies of 10k UTF-16 names pass the 32k mark of the string storage
        let long = "x".repeat(10_000);
        let font_info = FontInfo {
            family_name: long.clone(),
            full_name: long.clone(),
            ..info()
        };
        let font = to_ttf(&font_info, &[notdef()]).unwrap();
        let face = ttf_parser::Face::parse(&font, 0).unwrap();

        let family = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::FAMILY)
            .and_then(|n| n.to_string());
        assert_eq!(family.map(|f| f.len()), Some(long.len()));
    }

    #[test]
    fn test_output_is_deterministic() {
        let glyphs = [notdef(), square(0xE000)];
        assert_eq!(to_ttf(&info(), &glyphs).unwrap(), to_ttf(&info(), &glyphs).unwrap());
    }
}
