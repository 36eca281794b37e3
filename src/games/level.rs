//! Platformer level layouts and their shareable text codes.
//!
//! A level code is a JSON array of object records wrapped in standard base64.
//! Each record carries `type`, `x`, `y`, `width`, `height`, `color` and, for
//! power-ups, `powerUpType`. Records this build does not understand are
//! skipped so codes from newer layouts still load.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::sim::{Aabb, CANVAS_HEIGHT, CANVAS_WIDTH};

/// Editor grid and player size.
pub const GRID: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerKind {
    Invincibility,
    IronSkin,
    Fly,
    Speed,
}

impl PowerKind {
    pub const ALL: [PowerKind; 4] = [
        PowerKind::Invincibility,
        PowerKind::IronSkin,
        PowerKind::Fly,
        PowerKind::Speed,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            PowerKind::Invincibility => "invincibility",
            PowerKind::IronSkin => "ironSkin",
            PowerKind::Fly => "fly",
            PowerKind::Speed => "speed",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Platform,
    Hazard,
    Coin,
    Checkpoint,
    EndFlag,
    PowerUp(PowerKind),
}

impl ObjectKind {
    pub fn tag(self) -> &'static str {
        match self {
            ObjectKind::Platform => "Platform",
            ObjectKind::Hazard => "Hazard",
            ObjectKind::Coin => "Coin",
            ObjectKind::Checkpoint => "Checkpoint",
            ObjectKind::EndFlag => "EndFlag",
            ObjectKind::PowerUp(_) => "PowerUp",
        }
    }

    /// CSS-style colour stored in level codes.
    pub fn color(self) -> &'static str {
        match self {
            ObjectKind::Platform => "#ff00ff",
            ObjectKind::Hazard => "#ff4500",
            ObjectKind::Coin => "#ffd700",
            ObjectKind::Checkpoint => "#00ff00",
            ObjectKind::EndFlag | ObjectKind::PowerUp(_) => "#ffffff",
        }
    }

    /// Kinds whose size is not up to the level author.
    pub fn fixed_size(self) -> Option<(f32, f32)> {
        match self {
            ObjectKind::Platform | ObjectKind::Hazard => None,
            ObjectKind::Coin => Some((GRID / 2.0, GRID / 2.0)),
            ObjectKind::Checkpoint | ObjectKind::EndFlag => Some((GRID, GRID * 2.0)),
            ObjectKind::PowerUp(_) => Some((GRID, GRID)),
        }
    }

    fn from_record(tag: &str, power: Option<&str>) -> Option<Self> {
        Some(match tag {
            "Platform" => ObjectKind::Platform,
            "Hazard" => ObjectKind::Hazard,
            "Coin" => ObjectKind::Coin,
            "Checkpoint" => ObjectKind::Checkpoint,
            "EndFlag" => ObjectKind::EndFlag,
            "PowerUp" => ObjectKind::PowerUp(PowerKind::from_tag(power?)?),
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelObject {
    pub kind: ObjectKind,
    pub rect: Aabb,
}

impl LevelObject {
    pub fn new(kind: ObjectKind, x: f32, y: f32, w: f32, h: f32) -> Self {
        let (w, h) = kind.fixed_size().unwrap_or((w, h));
        Self {
            kind,
            rect: Aabb::new(x, y, w, h),
        }
    }

    /// Object dropped on a grid cell by the editor: one cell unless the kind
    /// has its own size.
    pub fn at(kind: ObjectKind, x: f32, y: f32) -> Self {
        Self::new(kind, x, y, GRID, GRID)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    #[serde(rename = "type")]
    kind: String,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default)]
    color: String,
    #[serde(rename = "powerUpType", default, skip_serializing_if = "Option::is_none")]
    power_up_type: Option<String>,
}

impl From<&LevelObject> for Record {
    fn from(obj: &LevelObject) -> Self {
        Record {
            kind: obj.kind.tag().to_string(),
            x: obj.rect.x,
            y: obj.rect.y,
            width: obj.rect.w,
            height: obj.rect.h,
            color: obj.kind.color().to_string(),
            power_up_type: match obj.kind {
                ObjectKind::PowerUp(p) => Some(p.tag().to_string()),
                _ => None,
            },
        }
    }
}

/// The built-in starter level: a floor, two ledges, one coin and the flag.
pub fn default_level() -> Vec<LevelObject> {
    vec![
        LevelObject::new(ObjectKind::Platform, 0.0, CANVAS_HEIGHT - GRID, CANVAS_WIDTH, GRID),
        LevelObject::new(ObjectKind::Platform, GRID * 5.0, CANVAS_HEIGHT - GRID * 5.0, GRID * 3.0, GRID),
        LevelObject::new(ObjectKind::Platform, GRID * 10.0, CANVAS_HEIGHT - GRID * 8.0, GRID * 3.0, GRID),
        LevelObject::at(ObjectKind::Coin, GRID * 6.0, CANVAS_HEIGHT - GRID * 6.0),
        LevelObject::at(ObjectKind::EndFlag, CANVAS_WIDTH - GRID * 2.0, CANVAS_HEIGHT - GRID * 3.0),
    ]
}

pub fn export(objects: &[LevelObject]) -> String {
    let records: Vec<Record> = objects.iter().map(Record::from).collect();
    // Serialising plain structs of strings and floats does not fail
    let json = serde_json::to_string(&records).unwrap_or_else(|_| "[]".to_string());
    STANDARD.encode(json)
}

pub fn import(code: &str) -> Result<Vec<LevelObject>, LevelError> {
    let bytes = STANDARD.decode(code.trim())?;
    let text = String::from_utf8(bytes)?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&text)?;

    let mut objects = Vec::with_capacity(values.len());
    for (i, value) in values.into_iter().enumerate() {
        let record: Record = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("level record {} skipped: {}", i, e);
                continue;
            }
        };
        match ObjectKind::from_record(&record.kind, record.power_up_type.as_deref()) {
            Some(kind) => objects.push(LevelObject::new(kind, record.x, record.y, record.width, record.height)),
            None => log::warn!(
                "level record {} skipped: unknown type {:?} ({:?})",
                i,
                record.kind,
                record.power_up_type
            ),
        }
    }
    Ok(objects)
}

pub fn write_file(path: &Path, objects: &[LevelObject]) -> Result<(), LevelError> {
    fs::write(path, export(objects))?;
    log::info!("exported {} level objects to {}", objects.len(), path.display());
    Ok(())
}

pub fn read_file(path: &Path) -> Result<Vec<LevelObject>, LevelError> {
    let code = fs::read_to_string(path)?;
    let objects = import(&code)?;
    log::info!("imported {} level objects from {}", objects.len(), path.display());
    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_import_reproduces_layout() {
        let mut level = default_level();
        level.push(LevelObject::new(ObjectKind::Hazard, 64.0, 96.0, 32.0, 32.0));
        level.push(LevelObject::at(ObjectKind::Checkpoint, 128.0, 32.0));
        level.push(LevelObject::at(ObjectKind::PowerUp(PowerKind::IronSkin), 256.0, 64.0));

        let back = import(&export(&level)).unwrap();
        assert_eq!(back, level);
    }

    #[test]
    fn test_export_uses_record_field_names() {
        let code = export(&[LevelObject::at(ObjectKind::PowerUp(PowerKind::Fly), 32.0, 64.0)]);
        let text = String::from_utf8(STANDARD.decode(code).unwrap()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v[0]["type"], "PowerUp");
        assert_eq!(v[0]["powerUpType"], "fly");
        assert_eq!(v[0]["width"], 32.0);
        assert_eq!(v[0]["color"], "#ffffff");
    }

    #[test]
    fn test_unknown_records_are_skipped() {
        let json = r##"[
            {"type":"Platform","x":0,"y":568,"width":800,"height":32,"color":"#ff00ff"},
            {"type":"Trampoline","x":10,"y":10,"width":32,"height":32},
            {"type":"PowerUp","x":64,"y":64,"width":32,"height":32,"powerUpType":"teleport"},
            {"type":"Coin","x":96,"y":96,"width":999,"height":999},
            "not even an object"
        ]"##;
        let objects = import(&STANDARD.encode(json)).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].kind, ObjectKind::Platform);
        assert_eq!(objects[1].kind, ObjectKind::Coin);
        assert_eq!((objects[1].rect.w, objects[1].rect.h), (16.0, 16.0));
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(matches!(import("%%% not base64"), Err(LevelError::Encoding(_))));
        assert!(matches!(import(&STANDARD.encode([0xff, 0xfe])), Err(LevelError::Utf8(_))));
        assert!(matches!(import(&STANDARD.encode("{\"type\":1}")), Err(LevelError::Json(_))));
    }

    #[test]
    fn test_default_level_shape() {
        let level = default_level();
        assert_eq!(level[0].rect, Aabb::new(0.0, 568.0, 800.0, 32.0));
        assert_eq!(level.iter().filter(|o| o.kind == ObjectKind::Coin).count(), 1);
        assert_eq!(level[4].rect, Aabb::new(736.0, 504.0, 32.0, 64.0));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("neoncade-level-{}.txt", std::process::id()));
        write_file(&path, &default_level()).unwrap();
        assert_eq!(read_file(&path).unwrap(), default_level());
        let _ = std::fs::remove_file(&path);
    }
}
