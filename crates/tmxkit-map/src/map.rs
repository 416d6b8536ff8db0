//! The `<map>` document and its map-level configuration.

use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tmxkit_common::Color;
use tmxkit_xml::{DocumentLoader, FsLoader, XmlElement};
use tracing::{debug, trace};

use crate::attributes::Attributes;
use crate::error::UnknownKeyword;
use crate::layer::{ImageLayer, LayerKind, LayerRef, TileLayer};
use crate::list::NamedList;
use crate::object::ObjectGroup;
use crate::properties::Properties;
use crate::tileset::Tileset;
use crate::{Error, Result};

/// Grid projection of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Orthogonal,
    Isometric,
    Staggered,
    Hexagonal,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orthogonal => "orthogonal",
            Self::Isometric => "isometric",
            Self::Staggered => "staggered",
            Self::Hexagonal => "hexagonal",
        }
    }

    /// Staggered and hexagonal maps use the stagger axis and index.
    pub fn is_staggered(&self) -> bool {
        matches!(self, Self::Staggered | Self::Hexagonal)
    }
}

impl FromStr for Orientation {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        [Self::Orthogonal, Self::Isometric, Self::Staggered, Self::Hexagonal]
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKeyword(s.to_string()))
    }
}

/// Order in which tiles of a tile layer are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderOrder {
    #[default]
    RightDown,
    RightUp,
    LeftDown,
    LeftUp,
}

impl RenderOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RightDown => "right-down",
            Self::RightUp => "right-up",
            Self::LeftDown => "left-down",
            Self::LeftUp => "left-up",
        }
    }
}

impl FromStr for RenderOrder {
    type Err = UnknownKeyword;

    /// Separators are ignored, so `right-down`, `rightdown` and `RightDown`
    /// are all accepted.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let compact = s.replace('-', "");
        [Self::RightDown, Self::RightUp, Self::LeftDown, Self::LeftUp]
            .into_iter()
            .find(|o| o.as_str().replace('-', "").eq_ignore_ascii_case(&compact))
            .ok_or_else(|| UnknownKeyword(s.to_string()))
    }
}

/// Which axis is staggered on staggered and hexagonal maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaggerAxis {
    X,
    Y,
}

impl FromStr for StaggerAxis {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            _ => Err(UnknownKeyword(s.to_string())),
        }
    }
}

/// Whether odd or even rows/columns are shifted on staggered maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaggerIndex {
    Odd,
    Even,
}

impl FromStr for StaggerIndex {
    type Err = UnknownKeyword;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("odd") {
            Ok(Self::Odd)
        } else if s.eq_ignore_ascii_case("even") {
            Ok(Self::Even)
        } else {
            Err(UnknownKeyword(s.to_string()))
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RenderOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed TMX map.
///
/// Tile layers, object groups and image layers each live in their own
/// [`NamedList`]; [`draw_order`](Self::draw_order) interleaves them in
/// document order.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use tmxkit_map::{LayerRef, Map};
/// use tmxkit_xml::MemoryLoader;
///
/// let xml = r#"<map version="1.10" orientation="orthogonal" width="2" height="1"
///                   tilewidth="16" tileheight="16">
///     <tileset firstgid="1" name="t" tilewidth="16" tileheight="16" tilecount="4"/>
///     <layer name="Ground"><data encoding="csv">1,2</data></layer>
///     <objectgroup name="Things"/>
/// </map>"#;
///
/// let map = Map::from_xml_str(xml, Path::new("."), &MemoryLoader::new())?;
/// let names: Vec<_> = map.draw_order().map(|l| l.name()).collect();
/// assert_eq!(names, ["Ground", "Things"]);
/// assert_eq!(map.tileset_for_gid(2).map(|t| t.name.as_str()), Some("t"));
/// # Ok::<(), tmxkit_map::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub version: String,
    pub tiled_version: Option<String>,
    pub orientation: Orientation,
    pub render_order: RenderOrder,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub hex_side_length: Option<u32>,
    /// Only meaningful when [`Orientation::is_staggered`].
    pub stagger_axis: Option<StaggerAxis>,
    /// Only meaningful when [`Orientation::is_staggered`].
    pub stagger_index: Option<StaggerIndex>,
    pub background_color: Option<Color>,
    pub next_layer_id: Option<u32>,
    pub next_object_id: Option<u32>,
    /// Directory relative paths in the document resolve against.
    pub base_dir: PathBuf,
    properties: Properties,
    tilesets: NamedList<Tileset>,
    tile_layers: NamedList<TileLayer>,
    object_groups: NamedList<ObjectGroup>,
    image_layers: NamedList<ImageLayer>,
    draw_order: Vec<(LayerKind, usize)>,
}

impl Map {
    /// Load and parse the map at `path` through `loader`.
    pub fn load(path: impl AsRef<Path>, loader: &dyn DocumentLoader) -> Result<Self> {
        let path = path.as_ref();
        let root = loader
            .load(path)
            .map_err(|source| Error::UnresolvedReference {
                path: path.to_path_buf(),
                source,
            })?;
        let base_dir = path.parent().unwrap_or(Path::new(""));
        Self::parse(&root, base_dir, loader)
    }

    /// Load and parse a map file from the local filesystem.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(path, &FsLoader)
    }

    /// Parse map XML text. External tilesets resolve against `base_dir`.
    pub fn from_xml_str(xml: &str, base_dir: &Path, loader: &dyn DocumentLoader) -> Result<Self> {
        let root = XmlElement::parse_str(xml).map_err(|e| Error::MalformedDocument(e.to_string()))?;
        Self::parse(&root, base_dir, loader)
    }

    /// Parse map XML from a byte stream. External tilesets resolve against
    /// `base_dir`.
    pub fn from_reader<R: BufRead>(
        reader: R,
        base_dir: &Path,
        loader: &dyn DocumentLoader,
    ) -> Result<Self> {
        let root =
            XmlElement::parse_reader(reader).map_err(|e| Error::MalformedDocument(e.to_string()))?;
        Self::parse(&root, base_dir, loader)
    }

    /// Build a map from an already parsed `<map>` element.
    pub fn parse(root: &XmlElement, base_dir: &Path, loader: &dyn DocumentLoader) -> Result<Self> {
        if root.name() != "map" {
            return Err(Error::MalformedDocument(format!(
                "root element is <{}>, expected <map>",
                root.name()
            )));
        }

        let attrs = Attributes::new(root, Error::MalformedDocument);
        let width = attrs.required("width")?;
        let height = attrs.required("height")?;

        let mut map = Self {
            version: attrs.required_str("version")?.to_string(),
            tiled_version: attrs.str("tiledversion").map(str::to_string),
            orientation: attrs.required("orientation")?,
            render_order: attrs.or("renderorder", RenderOrder::RightDown)?,
            width,
            height,
            tile_width: attrs.required("tilewidth")?,
            tile_height: attrs.required("tileheight")?,
            hex_side_length: attrs.optional("hexsidelength")?,
            stagger_axis: attrs.optional("staggeraxis")?,
            stagger_index: attrs.optional("staggerindex")?,
            background_color: attrs.color("backgroundcolor")?,
            next_layer_id: attrs.optional("nextlayerid")?,
            next_object_id: attrs.optional("nextobjectid")?,
            base_dir: base_dir.to_path_buf(),
            properties: Properties::default(),
            tilesets: NamedList::new(),
            tile_layers: NamedList::new(),
            object_groups: NamedList::new(),
            image_layers: NamedList::new(),
            draw_order: Vec::new(),
        };

        // One counter across all drawable kinds; tilesets and properties
        // do not take a slot.
        let mut order_index = 0;
        for child in root.children() {
            match child.name() {
                "tileset" => {
                    map.tilesets.push(Tileset::parse(child, base_dir, loader)?);
                }
                "layer" => {
                    let layer = TileLayer::parse(child, width, height, order_index)?;
                    map.draw_order.push((LayerKind::Tile, map.tile_layers.len()));
                    map.tile_layers.push(layer);
                    order_index += 1;
                }
                "objectgroup" => {
                    let group = ObjectGroup::parse(child, order_index)?;
                    map.draw_order.push((LayerKind::Objects, map.object_groups.len()));
                    map.object_groups.push(group);
                    order_index += 1;
                }
                "imagelayer" => {
                    let layer = ImageLayer::parse(child, base_dir, order_index)?;
                    map.draw_order.push((LayerKind::Image, map.image_layers.len()));
                    map.image_layers.push(layer);
                    order_index += 1;
                }
                "properties" => {
                    map.properties.merge(Properties::parse(child)?);
                }
                other => {
                    trace!(element = other, "skipping unsupported map child");
                }
            }
        }

        debug!(
            version = %map.version,
            orientation = %map.orientation,
            width = map.width,
            height = map.height,
            tilesets = map.tilesets.len(),
            layers = map.draw_order.len(),
            "parsed map"
        );
        Ok(map)
    }

    /// Map-level custom properties.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Tilesets in document order.
    pub fn tilesets(&self) -> &NamedList<Tileset> {
        &self.tilesets
    }

    /// Tile layers in document order.
    pub fn tile_layers(&self) -> &NamedList<TileLayer> {
        &self.tile_layers
    }

    /// Object groups in document order.
    pub fn object_groups(&self) -> &NamedList<ObjectGroup> {
        &self.object_groups
    }

    /// Image layers in document order.
    pub fn image_layers(&self) -> &NamedList<ImageLayer> {
        &self.image_layers
    }

    /// Every drawable layer, bottom to top. The n-th item has
    /// `order_index() == n`.
    pub fn draw_order(&self) -> impl ExactSizeIterator<Item = LayerRef<'_>> + '_ {
        self.draw_order.iter().map(move |&(kind, i)| match kind {
            LayerKind::Tile => LayerRef::Tile(&self.tile_layers[i]),
            LayerKind::Objects => LayerRef::Objects(&self.object_groups[i]),
            LayerKind::Image => LayerRef::Image(&self.image_layers[i]),
        })
    }

    /// The tileset owning a bare GID; `None` for 0 and unowned GIDs.
    ///
    /// The candidate is the tileset with the greatest `first_gid <= gid`.
    /// When its `tilecount` is known, GIDs past its last tile are unowned.
    pub fn tileset_for_gid(&self, gid: u32) -> Option<&Tileset> {
        if gid == 0 {
            return None;
        }
        let tileset = self
            .tilesets
            .iter()
            .filter(|t| t.first_gid <= gid)
            .max_by_key(|t| t.first_gid)?;
        match tileset.tile_count {
            Some(count) if gid - tileset.first_gid >= count => None,
            _ => Some(tileset),
        }
    }

    /// The owning tileset and local tile id of a bare GID.
    pub fn resolve_gid(&self, gid: u32) -> Option<(&Tileset, u32)> {
        let tileset = self.tileset_for_gid(gid)?;
        Some((tileset, gid - tileset.first_gid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_case_insensitive() {
        assert_eq!("Hexagonal".parse::<Orientation>(), Ok(Orientation::Hexagonal));
        assert_eq!("hexagonal".parse::<Orientation>(), Ok(Orientation::Hexagonal));
        assert_eq!("ORTHOGONAL".parse::<Orientation>(), Ok(Orientation::Orthogonal));
        assert!("oblique".parse::<Orientation>().is_err());
        assert!(Orientation::Staggered.is_staggered());
        assert!(!Orientation::Isometric.is_staggered());
    }

    #[test]
    fn test_render_order_separators() {
        assert_eq!("right-down".parse::<RenderOrder>(), Ok(RenderOrder::RightDown));
        assert_eq!("LeftUp".parse::<RenderOrder>(), Ok(RenderOrder::LeftUp));
        assert_eq!("left-down".parse::<RenderOrder>(), Ok(RenderOrder::LeftDown));
        assert_eq!("rightup".parse::<RenderOrder>(), Ok(RenderOrder::RightUp));
        assert!("up-right".parse::<RenderOrder>().is_err());
        assert_eq!(RenderOrder::default(), RenderOrder::RightDown);
    }

    #[test]
    fn test_stagger_keywords() {
        assert_eq!("x".parse::<StaggerAxis>(), Ok(StaggerAxis::X));
        assert_eq!("y".parse::<StaggerAxis>(), Ok(StaggerAxis::Y));
        assert!("z".parse::<StaggerAxis>().is_err());
        assert_eq!("odd".parse::<StaggerIndex>(), Ok(StaggerIndex::Odd));
        assert_eq!("Even".parse::<StaggerIndex>(), Ok(StaggerIndex::Even));
        assert!("both".parse::<StaggerIndex>().is_err());
    }

    const HEADER: &str = r#"version="1.10" orientation="orthogonal" width="2" height="1"
        tilewidth="8" tileheight="8""#;

    fn parse(body: &str, extra: &str) -> Result<Map> {
        let xml = format!("<map {HEADER} {extra}>{body}</map>");
        Map::from_xml_str(&xml, Path::new(""), &tmxkit_xml::MemoryLoader::new())
    }

    #[test]
    fn test_order_index_skips_tilesets_and_properties() {
        let map = parse(
            r#"<tileset firstgid="1" name="t" tilewidth="8" tileheight="8"/>
               <layer name="l"><data encoding="csv">1,0</data></layer>
               <objectgroup name="o"/>
               <properties><property name="p" value="v"/></properties>
               <imagelayer name="i"/>"#,
            "",
        )
        .unwrap();

        assert_eq!(map.tile_layers()[0].order_index, 0);
        assert_eq!(map.object_groups()[0].order_index, 1);
        assert_eq!(map.image_layers()[0].order_index, 2);
        assert_eq!(map.tilesets().len(), 1);
        assert!(map.properties().contains("p"));

        for (position, layer) in map.draw_order().enumerate() {
            assert_eq!(layer.order_index(), position);
        }
    }

    #[test]
    fn test_background_color() {
        let map = parse("", r##"backgroundcolor="#FF0000""##).unwrap();
        assert_eq!(map.background_color, Some(Color::rgba(255, 0, 0, 255)));

        let map = parse("", "").unwrap();
        assert_eq!(map.background_color, None);
        assert_eq!(map.render_order, RenderOrder::RightDown);
        assert_eq!(map.stagger_axis, None);
    }

    #[test]
    fn test_invalid_optional_keywords_fail() {
        assert!(matches!(
            parse("", r#"staggeraxis="z""#),
            Err(Error::MalformedDocument(_))
        ));
        assert!(matches!(
            parse("", r#"renderorder="diagonal""#),
            Err(Error::MalformedDocument(_))
        ));
        assert!(matches!(
            parse("", r#"nextobjectid="many""#),
            Err(Error::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_unknown_children_are_skipped() {
        let map = parse(r#"<group name="g"><layer name="inner"/></group><editorsettings/>"#, "").unwrap();
        assert_eq!(map.draw_order().len(), 0);
    }

    #[test]
    fn test_resolve_gid_with_unsorted_tilesets() {
        let map = parse(
            r#"<tileset firstgid="20" name="late" tilewidth="8" tileheight="8"/>
               <tileset firstgid="1" name="early" tilewidth="8" tileheight="8"/>"#,
            "",
        )
        .unwrap();
        assert_eq!(map.resolve_gid(19).map(|(t, id)| (t.name.as_str(), id)), Some(("early", 18)));
        assert_eq!(map.resolve_gid(21).map(|(t, id)| (t.name.as_str(), id)), Some(("late", 1)));
        assert!(map.resolve_gid(0).is_none());
    }

    #[test]
    fn test_gid_past_tile_count_is_unowned() {
        let map = parse(
            r#"<tileset firstgid="1" name="t" tilewidth="8" tileheight="8" tilecount="4"/>"#,
            "",
        )
        .unwrap();
        let tileset = &map.tilesets()[0];

        assert_eq!(map.resolve_gid(4).map(|(t, id)| (t.name.as_str(), id)), Some(("t", 3)));
        assert!(map.tileset_for_gid(5).is_none());
        assert!(map.tileset_for_gid(100).is_none());
        assert!(map.resolve_gid(100).is_none());
        assert_eq!(tileset.local_id(100), None);
        assert_eq!(tileset.local_id(4), Some(3));
    }

    #[test]
    fn test_repeated_properties_elements_merge() {
        let map = parse(
            r#"<properties>
                   <property name="a" value="1"/>
                   <property name="b" value="old"/>
               </properties>
               <properties><property name="b" value="new"/></properties>"#,
            "",
        )
        .unwrap();

        assert_eq!(map.properties().len(), 2);
        assert_eq!(map.properties().get("a").and_then(|v| v.as_str()), Some("1"));
        assert_eq!(map.properties().get("b").and_then(|v| v.as_str()), Some("new"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Orientation::Isometric.to_string(), "isometric");
        assert_eq!(RenderOrder::LeftUp.to_string(), "left-up");
    }
}
