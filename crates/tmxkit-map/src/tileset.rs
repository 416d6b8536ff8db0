//! Tilesets, inline (`<tileset>` inside the map) or external (`.tsx`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tmxkit_xml::{DocumentLoader, XmlElement};
use tracing::debug;

use crate::attributes::Attributes;
use crate::image::Image;
use crate::list::Named;
use crate::object::ObjectGroup;
use crate::properties::Properties;
use crate::{Error, Result};

/// Pixel offset applied when drawing this tileset's tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileOffset {
    pub x: i32,
    pub y: i32,
}

/// One frame of a tile animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Local id of the tile shown during this frame.
    pub tile_id: u32,
    /// Frame duration in milliseconds.
    pub duration: u32,
}

/// Per-tile data from a `<tile id="...">` child of a tileset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TilesetTile {
    /// Local id, relative to the tileset's first GID.
    pub id: u32,
    /// `type` (or `class` in newer documents).
    pub tile_type: Option<String>,
    pub probability: Option<f32>,
    /// Own image, for image-collection tilesets.
    pub image: Option<Image>,
    /// Collision shapes.
    pub collision: Option<ObjectGroup>,
    /// Empty when the tile is not animated.
    pub animation: Vec<Frame>,
    pub properties: Properties,
}

/// A tileset and the range of GIDs it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    pub first_gid: u32,
    pub name: String,
    /// Resolved path of the external `.tsx` document, if the tileset was
    /// referenced rather than embedded.
    pub source: Option<PathBuf>,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
    pub margin: u32,
    pub tile_count: Option<u32>,
    pub columns: Option<u32>,
    pub tile_offset: TileOffset,
    pub image: Option<Image>,
    /// Tiles with extra data, by local id. Tiles without any are absent.
    pub tiles: BTreeMap<u32, TilesetTile>,
    pub properties: Properties,
}

impl Tileset {
    /// Parse a map's `<tileset>` child.
    ///
    /// A `source` attribute makes this a reference: the document is fetched
    /// through `loader` relative to `base_dir`, `firstgid` is taken from the
    /// referencing element and everything else from the external document.
    pub fn parse(element: &XmlElement, base_dir: &Path, loader: &dyn DocumentLoader) -> Result<Self> {
        let attrs = Attributes::new(element, Error::MalformedTileset);
        let first_gid = attrs.required("firstgid")?;

        let Some(source) = attrs.str("source") else {
            return Self::parse_definition(element, first_gid, base_dir);
        };

        let path = base_dir.join(source);
        let root = loader
            .load(&path)
            .map_err(|source| Error::UnresolvedReference {
                path: path.clone(),
                source,
            })?;
        if root.name() != "tileset" {
            return Err(Error::MalformedTileset(format!(
                "{} has root <{}>, expected <tileset>",
                path.display(),
                root.name()
            )));
        }

        // Images inside the .tsx are relative to the .tsx itself
        let tileset_dir = path.parent().unwrap_or(base_dir);
        let mut tileset = Self::parse_definition(&root, first_gid, tileset_dir)?;
        debug!(name = %tileset.name, path = %path.display(), "loaded external tileset");
        tileset.source = Some(path);
        Ok(tileset)
    }

    /// Parse the tileset body: geometry, image, per-tile data.
    fn parse_definition(element: &XmlElement, first_gid: u32, base_dir: &Path) -> Result<Self> {
        let attrs = Attributes::new(element, Error::MalformedTileset);
        let name = attrs.string("name");

        let tile_offset = match element.child("tileoffset") {
            Some(offset) => {
                let offset_attrs = Attributes::new(offset, Error::MalformedTileset);
                TileOffset {
                    x: offset_attrs.or("x", 0)?,
                    y: offset_attrs.or("y", 0)?,
                }
            }
            None => TileOffset::default(),
        };

        let image = element
            .child("image")
            .map(|image| Image::parse(image, base_dir, Error::MalformedTileset))
            .transpose()?;

        let mut tiles = BTreeMap::new();
        for tile in element.children_named("tile") {
            let tile = parse_tile(tile, base_dir)?;
            tiles.insert(tile.id, tile);
        }

        let tileset = Self {
            first_gid,
            source: None,
            tile_width: attrs.required("tilewidth")?,
            tile_height: attrs.required("tileheight")?,
            spacing: attrs.or("spacing", 0)?,
            margin: attrs.or("margin", 0)?,
            tile_count: attrs.optional("tilecount")?,
            columns: attrs.optional("columns")?,
            tile_offset,
            image,
            tiles,
            properties: Properties::parse_child(element)?,
            name,
        };

        debug!(
            name = %tileset.name,
            first_gid,
            tile_count = ?tileset.tile_count,
            "parsed tileset"
        );
        Ok(tileset)
    }

    /// Number of tiles, from `tilecount` or else the highest per-tile id.
    pub fn len(&self) -> u32 {
        self.tile_count
            .or_else(|| self.tiles.keys().next_back().map(|id| id.saturating_add(1)))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Local id of a bare GID, if this tileset owns it.
    pub fn local_id(&self, gid: u32) -> Option<u32> {
        let id = gid.checked_sub(self.first_gid)?;
        (gid != 0 && id < self.len()).then_some(id)
    }

    /// Per-tile data for a local id.
    pub fn tile(&self, local_id: u32) -> Option<&TilesetTile> {
        self.tiles.get(&local_id)
    }

    /// Top-left pixel of a tile inside the tileset image.
    ///
    /// `None` for image-collection tilesets, unknown column counts, and
    /// positions past `u32::MAX`.
    pub fn tile_image_position(&self, local_id: u32) -> Option<(u32, u32)> {
        let columns = self.columns.filter(|&c| c > 0)?;
        self.image.as_ref()?;

        let offset = |index: u32, size: u32| -> Option<u32> {
            size.checked_add(self.spacing)?
                .checked_mul(index)?
                .checked_add(self.margin)
        };
        Some((
            offset(local_id % columns, self.tile_width)?,
            offset(local_id / columns, self.tile_height)?,
        ))
    }
}

impl Named for Tileset {
    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_tile(element: &XmlElement, base_dir: &Path) -> Result<TilesetTile> {
    let attrs = Attributes::new(element, Error::MalformedTileset);

    let animation = match element.child("animation") {
        Some(animation) => animation
            .children_named("frame")
            .map(|frame| {
                let frame_attrs = Attributes::new(frame, Error::MalformedTileset);
                Ok(Frame {
                    tile_id: frame_attrs.required("tileid")?,
                    duration: frame_attrs.required("duration")?,
                })
            })
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(TilesetTile {
        id: attrs.required("id")?,
        tile_type: attrs.str("type").or(attrs.str("class")).map(str::to_string),
        probability: attrs.optional("probability")?,
        image: element
            .child("image")
            .map(|image| Image::parse(image, base_dir, Error::MalformedTileset))
            .transpose()?,
        collision: element
            .child("objectgroup")
            .map(|group| ObjectGroup::parse(group, 0))
            .transpose()?,
        animation,
        properties: Properties::parse_child(element)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmxkit_xml::MemoryLoader;

    const INLINE: &str = r#"
        <tileset firstgid="1" name="terrain" tilewidth="16" tileheight="16"
                 spacing="2" margin="1" tilecount="8" columns="4">
            <tileoffset x="0" y="-8"/>
            <image source="terrain.png" width="73" height="37"/>
            <tile id="5" type="water" probability="0.5">
                <properties><property name="speed" type="float" value="0.5"/></properties>
                <objectgroup draworder="index">
                    <object id="1" x="0" y="0" width="16" height="8"/>
                </objectgroup>
                <animation>
                    <frame tileid="5" duration="100"/>
                    <frame tileid="6" duration="150"/>
                </animation>
            </tile>
        </tileset>"#;

    fn parse(xml: &str, loader: &MemoryLoader) -> Result<Tileset> {
        let element = XmlElement::parse_str(xml).unwrap();
        Tileset::parse(&element, Path::new("maps"), loader)
    }

    #[test]
    fn test_inline_tileset() {
        let tileset = parse(INLINE, &MemoryLoader::new()).unwrap();

        assert_eq!(tileset.name, "terrain");
        assert_eq!(tileset.first_gid, 1);
        assert_eq!((tileset.tile_width, tileset.tile_height), (16, 16));
        assert_eq!((tileset.spacing, tileset.margin), (2, 1));
        assert_eq!(tileset.tile_offset, TileOffset { x: 0, y: -8 });
        assert_eq!(tileset.source, None);

        let image = tileset.image.as_ref().unwrap();
        assert_eq!(image.path, Path::new("maps/terrain.png"));

        let water = tileset.tile(5).unwrap();
        assert_eq!(water.tile_type.as_deref(), Some("water"));
        assert_eq!(water.probability, Some(0.5));
        assert_eq!(water.properties.len(), 1);
        assert_eq!(water.collision.as_ref().map(|g| g.objects.len()), Some(1));
        assert_eq!(
            water.animation,
            vec![
                Frame { tile_id: 5, duration: 100 },
                Frame { tile_id: 6, duration: 150 }
            ]
        );
        assert!(tileset.tile(0).is_none());
    }

    #[test]
    fn test_gid_ranges() {
        let tileset = parse(INLINE, &MemoryLoader::new()).unwrap();

        assert_eq!(tileset.local_id(0), None);
        assert_eq!(tileset.local_id(1), Some(0));
        assert_eq!(tileset.local_id(8), Some(7));
        assert_eq!(tileset.local_id(9), None);
        assert_eq!(tileset.len(), 8);
    }

    #[test]
    fn test_tile_image_position() {
        let tileset = parse(INLINE, &MemoryLoader::new()).unwrap();
        assert_eq!(tileset.tile_image_position(0), Some((1, 1)));
        assert_eq!(tileset.tile_image_position(5), Some((19, 19)));
    }

    #[test]
    fn test_tile_image_position_overflow() {
        let mut tileset = parse(INLINE, &MemoryLoader::new()).unwrap();
        assert_eq!(tileset.tile_image_position(u32::MAX), None);

        tileset.tile_width = u32::MAX;
        assert_eq!(tileset.tile_image_position(0), None);

        tileset.tile_width = 16;
        tileset.margin = u32::MAX;
        assert_eq!(tileset.tile_image_position(1), None);
    }

    #[test]
    fn test_external_tileset() {
        let loader = MemoryLoader::new().with(
            "maps/../tilesets/dungeon.tsx",
            r#"<tileset name="dungeon" tilewidth="32" tileheight="32" tilecount="4" columns="2">
                <image source="dungeon.png"/>
            </tileset>"#,
        );
        let tileset = parse(
            r#"<tileset firstgid="33" source="../tilesets/dungeon.tsx"/>"#,
            &loader,
        )
        .unwrap();

        assert_eq!(tileset.first_gid, 33);
        assert_eq!(tileset.name, "dungeon");
        assert_eq!(tileset.tile_width, 32);
        assert_eq!(tileset.source.as_deref(), Some(Path::new("maps/../tilesets/dungeon.tsx")));
        assert_eq!(
            tileset.image.as_ref().map(|i| i.path.clone()),
            Some(PathBuf::from("maps/../tilesets/dungeon.png"))
        );
        assert_eq!(tileset.local_id(36), Some(3));
    }

    #[test]
    fn test_external_tileset_missing() {
        let result = parse(r#"<tileset firstgid="1" source="gone.tsx"/>"#, &MemoryLoader::new());
        assert!(matches!(
            result,
            Err(Error::UnresolvedReference { ref path, .. }) if path == Path::new("maps/gone.tsx")
        ));
    }

    #[test]
    fn test_external_tileset_wrong_root() {
        let loader = MemoryLoader::new().with("maps/a.tsx", "<map/>");
        let result = parse(r#"<tileset firstgid="1" source="a.tsx"/>"#, &loader);
        assert!(matches!(result, Err(Error::MalformedTileset(_))));
    }

    #[test]
    fn test_missing_geometry() {
        let result = parse(
            r#"<tileset firstgid="1" name="x" tilewidth="16"/>"#,
            &MemoryLoader::new(),
        );
        assert!(matches!(result, Err(Error::MalformedTileset(m)) if m.contains("tileheight")));

        let result = parse(
            r#"<tileset name="x" tilewidth="16" tileheight="16"/>"#,
            &MemoryLoader::new(),
        );
        assert!(matches!(result, Err(Error::MalformedTileset(m)) if m.contains("firstgid")));
    }

    #[test]
    fn test_len_without_tilecount() {
        let tileset = parse(
            r#"<tileset firstgid="1" name="c" tilewidth="8" tileheight="8">
                <tile id="0"><image source="a.png"/></tile>
                <tile id="3"><image source="b.png"/></tile>
            </tileset>"#,
            &MemoryLoader::new(),
        )
        .unwrap();
        assert_eq!(tileset.len(), 4);
        assert_eq!(tileset.tile_image_position(0), None);
        assert_eq!(
            tileset.tile(3).and_then(|t| t.image.as_ref()).map(|i| i.source.as_str()),
            Some("b.png")
        );
    }
}
