//! Shared "current/max" resource fragment embedded in unit state blocks.
//!
//! Layout: `hp/max, mag/max, stam/max, ult/max, ww/max, shield,
//! magicka_regen, stamina_regen, ultimate_regen, [map_x, map_y, heading]`

use memchr::memchr;

/// Fields in a snapshot without the positional triple.
pub const SNAPSHOT_MIN_FIELDS: usize = 9;
/// Fields in a snapshot carrying the positional triple.
pub const SNAPSHOT_MAX_FIELDS: usize = 12;

const FIELD_NAMES: [&str; SNAPSHOT_MAX_FIELDS] = [
    "health",
    "magicka",
    "stamina",
    "ultimate",
    "werewolf",
    "shield",
    "magicka_regen",
    "stamina_regen",
    "ultimate_regen",
    "map_x",
    "map_y",
    "heading",
];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResourceSnapshot {
    pub health_current: i64,
    pub health_max: i64,
    pub magicka_current: i64,
    pub magicka_max: i64,
    pub stamina_current: i64,
    pub stamina_max: i64,
    pub ultimate_current: i64,
    pub ultimate_max: i64,
    pub werewolf_current: i64,
    pub werewolf_max: i64,
    pub shield: i64,
    pub magicka_regen: f32,
    pub stamina_regen: f32,
    pub ultimate_regen: f32,
    pub map_x: f32,
    pub map_y: f32,
    /// Radians
    pub heading: f32,
}

impl ResourceSnapshot {
    /// True for the placeholder produced from an abbreviated record.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Decode a snapshot from the front of `fields`.
///
/// Returns the snapshot and the number of fields consumed. When fewer than
/// [`SNAPSHOT_MIN_FIELDS`] are available the snapshot is zeroed and every
/// remaining field is consumed. On a conversion failure returns the offset
/// and name of the offending field.
pub fn decode_snapshot<S: AsRef<str>>(
    fields: &[S],
) -> Result<(ResourceSnapshot, usize), (usize, &'static str)> {
    if fields.len() < SNAPSHOT_MIN_FIELDS {
        return Ok((ResourceSnapshot::default(), fields.len()));
    }

    let field = |i: usize| fields[i].as_ref();
    let pair = |i: usize| parse_pair(field(i)).ok_or((i, FIELD_NAMES[i]));
    let float = |i: usize| field(i).parse::<f32>().map_err(|_| (i, FIELD_NAMES[i]));

    let (health_current, health_max) = pair(0)?;
    let (magicka_current, magicka_max) = pair(1)?;
    let (stamina_current, stamina_max) = pair(2)?;
    let (ultimate_current, ultimate_max) = pair(3)?;
    let (werewolf_current, werewolf_max) = pair(4)?;
    let shield = field(5).parse::<i64>().map_err(|_| (5, FIELD_NAMES[5]))?;

    let mut snapshot = ResourceSnapshot {
        health_current,
        health_max,
        magicka_current,
        magicka_max,
        stamina_current,
        stamina_max,
        ultimate_current,
        ultimate_max,
        werewolf_current,
        werewolf_max,
        shield,
        magicka_regen: float(6)?,
        stamina_regen: float(7)?,
        ultimate_regen: float(8)?,
        ..Default::default()
    };

    // The positional triple is optional; a following unit block starts with
    // an id and a pair, which never reads as three floats.
    let position = fields
        .get(SNAPSHOT_MIN_FIELDS..SNAPSHOT_MAX_FIELDS)
        .and_then(|tail| {
            let x = tail[0].as_ref().parse::<f32>().ok()?;
            let y = tail[1].as_ref().parse::<f32>().ok()?;
            let heading = tail[2].as_ref().parse::<f32>().ok()?;
            Some((x, y, heading))
        });

    match position {
        Some((x, y, heading)) => {
            snapshot.map_x = x;
            snapshot.map_y = y;
            snapshot.heading = heading;
            Ok((snapshot, SNAPSHOT_MAX_FIELDS))
        }
        None => Ok((snapshot, SNAPSHOT_MIN_FIELDS)),
    }
}

/// Parse a `current/max` token.
pub fn parse_pair(token: &str) -> Option<(i64, i64)> {
    let slash = memchr(b'/', token.as_bytes())?;
    let current = token[..slash].parse::<i64>().ok()?;
    let max = token[slash + 1..].parse::<i64>().ok()?;
    Some((current, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: [&str; 9] = [
        "19576/19576",
        "14844/15729",
        "32560/33221",
        "500/500",
        "1000/1000",
        "0",
        "0.6681",
        "0.9093",
        "5.7946",
    ];

    #[test]
    fn decodes_nine_field_snapshot() {
        let (snapshot, consumed) = decode_snapshot(&BASE).unwrap();
        assert_eq!(consumed, 9);
        assert_eq!(snapshot.health_current, 19576);
        assert_eq!(snapshot.magicka_max, 15729);
        assert_eq!(snapshot.stamina_current, 32560);
        assert_eq!(snapshot.ultimate_max, 500);
        assert_eq!(snapshot.shield, 0);
        assert!((snapshot.ultimate_regen - 5.7946).abs() < 1e-4);
        assert_eq!(snapshot.heading, 0.0);
    }

    #[test]
    fn consumes_positional_triple_when_present() {
        let mut fields = BASE.to_vec();
        fields.extend(["0.5123", "0.4411", "3.1415"]);
        let (snapshot, consumed) = decode_snapshot(&fields[..]).unwrap();
        assert_eq!(consumed, 12);
        assert!((snapshot.map_y - 0.4411).abs() < 1e-4);
        assert!((snapshot.heading - 3.1415).abs() < 1e-4);
    }

    #[test]
    fn leaves_following_unit_block_alone() {
        let mut fields = BASE.to_vec();
        fields.extend(["72", "100/100", "5/5"]);
        let (_, consumed) = decode_snapshot(&fields[..]).unwrap();
        assert_eq!(consumed, 9);
    }

    #[test]
    fn abbreviated_snapshot_is_zeroed() {
        let (snapshot, consumed) = decode_snapshot(&["100/200", "5/5"]).unwrap();
        assert_eq!(consumed, 2);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn bad_field_reports_offset() {
        let mut fields = BASE.to_vec();
        fields[2] = "lots";
        assert_eq!(decode_snapshot(&fields[..]), Err((2, "stamina")));
    }

    #[test]
    fn parse_pair_requires_slash() {
        assert_eq!(parse_pair("10/20"), Some((10, 20)));
        assert_eq!(parse_pair("1020"), None);
        assert_eq!(parse_pair("a/20"), None);
    }
}
