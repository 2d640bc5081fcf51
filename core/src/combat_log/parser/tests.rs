use super::*;

fn parse(line: &str) -> LogEvent {
    LogParser::new().parse_line(line).unwrap()
}

const UNIT_BLOCK: &str = "19576/19576,14844/15729,32560/33221,500/500,1000/1000,0,0.6681,0.9093,5.7946";

// HEALTH_REGEN
#[test]
fn test_parse_health_regen_round_trip() {
    let event = parse(
        "252431,HEALTH_REGEN,898,72,19576/19576,14844/15729,32560/33221,500/500,1000/1000,0,0.6681,0.9093,5.7946",
    );
    let LogEvent::HealthRegen(entry) = event else {
        panic!("expected HealthRegen, got {event:?}");
    };
    assert_eq!(entry.line_number, 252431);
    assert_eq!(entry.effective_regen, 898);
    assert_eq!(entry.unit_id, "72");
    assert_eq!(entry.resources.health_current, 19576);
    assert_eq!(entry.resources.health_max, 19576);
    assert_eq!(entry.resources.magicka_current, 14844);
    assert_eq!(entry.resources.magicka_max, 15729);
}

#[test]
fn test_parse_health_regen_abbreviated_snapshot() {
    let event = parse("10,HEALTH_REGEN,12,5,100/100,1/1,2/2,3/3,4/4,0,0.1,0.2,0.3");
    assert!(matches!(event, LogEvent::HealthRegen(_)));

    let err = LogParser::new()
        .parse_line("10,HEALTH_REGEN,12,5,100/100")
        .unwrap_err();
    assert!(matches!(
        err,
        LineError::Decode(DecodeError::TooFewFields { expected: 11, found: 3, .. })
    ));
}

// UNIT_ADDED
#[test]
fn test_parse_unit_added_player() {
    let event = parse(
        r#"5,UNIT_ADDED,1,PLAYER,T,1,0,F,117,3,"Aela Frostborn","@aela",4021667,50,1800,0,PLAYER_ALLY,T"#,
    );
    let LogEvent::UnitAdded(unit) = event else {
        panic!("expected UnitAdded");
    };
    assert_eq!(unit.unit_id, "1");
    assert_eq!(unit.unit_type, UnitType::Player);
    assert!(unit.is_local_player);
    assert!(!unit.is_boss);
    assert_eq!(unit.class_id, 117);
    assert_eq!(unit.name, "Aela Frostborn");
    assert_eq!(unit.handle, "@aela");
    assert_eq!(unit.long_id, "4021667");
    assert_eq!(unit.champion_points, 1800);
    assert_eq!(unit.owner_unit_id, "0");
    assert!(unit.is_grouped);
}

#[test]
fn test_parse_unit_added_unknown_type_falls_back() {
    let event = parse(
        r#"5,UNIT_ADDED,9,CRITTER,F,0,0,F,0,0,"Mudcrab","",0,1,0,0,NEUTRAL,F"#,
    );
    let LogEvent::UnitAdded(unit) = event else {
        panic!("expected UnitAdded");
    };
    assert_eq!(unit.unit_type, UnitType::Other("CRITTER".to_string()));
}

#[test]
fn test_parse_unit_added_rejects_bad_bool() {
    let err = LogParser::new()
        .parse_line(r#"5,UNIT_ADDED,1,PLAYER,yes,1,0,F,117,3,"A","@a",1,50,0,0,PLAYER_ALLY,T"#)
        .unwrap_err();
    assert!(matches!(
        err,
        LineError::Decode(DecodeError::InvalidField { index: 2, name: "is_local_player", .. })
    ));
}

#[test]
fn test_parse_unit_ids_must_be_numeric() {
    let err = LogParser::new()
        .parse_line(r#"5,UNIT_ADDED,1,PLAYER,T,1,0,F,117,3,"A","@a",abc,50,0,0,PLAYER_ALLY,T"#)
        .unwrap_err();
    assert!(matches!(
        err,
        LineError::Decode(DecodeError::InvalidField { index: 10, name: "long_id", .. })
    ));

    let err = LogParser::new()
        .parse_line(r#"5,UNIT_ADDED,9,MONSTER,F,0,55,F,0,0,"Pet","",0,50,0,owner,PLAYER_ALLY,F"#)
        .unwrap_err();
    assert!(matches!(
        err,
        LineError::Decode(DecodeError::InvalidField { index: 13, name: "owner_unit_id", .. })
    ));

    let err = LogParser::new()
        .parse_line(r#"6,UNIT_CHANGED,1,1,3,"A","@a",-4,50,1800,0,PLAYER_ALLY,T"#)
        .unwrap_err();
    assert!(matches!(
        err,
        LineError::Decode(DecodeError::InvalidField { index: 5, name: "long_id", .. })
    ));
}

#[test]
fn test_parse_unit_added_too_few_fields() {
    let err = LogParser::new()
        .parse_line("5,UNIT_ADDED,1,PLAYER,T")
        .unwrap_err();
    assert!(matches!(
        err,
        LineError::Decode(DecodeError::TooFewFields { expected: 16, .. })
    ));
}

// COMBAT_EVENT
#[test]
fn test_parse_combat_event_with_target() {
    let line = format!("100,COMBAT_EVENT,DAMAGE,FIRE,1,5321,0,77,23234,1,{UNIT_BLOCK},99,{UNIT_BLOCK}");
    let LogEvent::CombatEvent(hit) = parse(&line) else {
        panic!("expected CombatEvent");
    };
    assert_eq!(hit.action_result, ActionResult::Damage);
    assert!(hit.action_result.is_damage());
    assert_eq!(hit.damage_type, "FIRE");
    assert_eq!(hit.hit_value, 5321);
    assert_eq!(hit.ability_id, 23234);
    assert_eq!(hit.source.unit_id, "1");
    let target = hit.target.unwrap();
    assert_eq!(target.unit_id, "99");
    assert_eq!(target.resources.stamina_max, 33221);
}

#[test]
fn test_parse_combat_event_self_target() {
    let line = format!("100,COMBAT_EVENT,HOT_TICK,GENERIC,0,800,0,78,40,1,{UNIT_BLOCK},*");
    let LogEvent::CombatEvent(hit) = parse(&line) else {
        panic!("expected CombatEvent");
    };
    assert!(hit.action_result.is_heal());
    assert!(hit.target.is_none());
}

#[test]
fn test_parse_combat_event_with_positions() {
    let line = format!(
        "100,COMBAT_EVENT,CRITICAL_DAMAGE,PHYSICAL,1,900,0,79,41,1,{UNIT_BLOCK},0.51,0.44,3.14,2,{UNIT_BLOCK},0.52,0.45,1.00"
    );
    let LogEvent::CombatEvent(hit) = parse(&line) else {
        panic!("expected CombatEvent");
    };
    assert!(hit.action_result.is_critical());
    assert!((hit.source.resources.map_x - 0.51).abs() < 1e-4);
    let target = hit.target.unwrap();
    assert_eq!(target.unit_id, "2");
    assert!((target.resources.heading - 1.0).abs() < 1e-4);
}

#[test]
fn test_parse_combat_event_bad_amount_fails_whole_record() {
    let line = format!("100,COMBAT_EVENT,DAMAGE,FIRE,1,lots,0,77,23234,1,{UNIT_BLOCK},*");
    let err = LogParser::new().parse_line(&line).unwrap_err();
    assert!(matches!(
        err,
        LineError::Decode(DecodeError::InvalidField { name: "hit_value", .. })
    ));
}

#[test]
fn test_parse_combat_event_bad_snapshot_fails_whole_record() {
    let line = "100,COMBAT_EVENT,DAMAGE,FIRE,1,10,0,77,23234,1,19576/19576,x/1,1/1,1/1,1/1,0,0.1,0.2,0.3,*";
    let err = LogParser::new().parse_line(line).unwrap_err();
    assert!(matches!(
        err,
        LineError::Decode(DecodeError::InvalidField { name: "magicka", index: 9, .. })
    ));
}

#[test]
fn test_parse_combat_event_missing_snapshot_is_tolerated() {
    let LogEvent::CombatEvent(hit) = parse("100,COMBAT_EVENT,DAMAGE,FIRE,1,250,0,77,23234,1") else {
        panic!("expected CombatEvent");
    };
    assert_eq!(hit.hit_value, 250);
    assert!(hit.source.resources.is_empty());
    assert!(hit.target.is_none());
}

// EFFECT_CHANGED
#[test]
fn test_parse_effect_changed_trailing_marker() {
    let line = format!("200,EFFECT_CHANGED,GAINED,2,88,61665,1,{UNIT_BLOCK},*,*");
    let LogEvent::EffectChanged(effect) = parse(&line) else {
        panic!("expected EffectChanged");
    };
    assert_eq!(effect.change_type, EffectChangeType::Gained);
    assert_eq!(effect.stack_count, 2);
    assert!(effect.target.is_none());
    assert_eq!(effect.player_initiated_remove_cast_track_id, None);
}

#[test]
fn test_parse_effect_changed_with_remove_id() {
    let line = format!("200,EFFECT_CHANGED,FADED,1,88,61665,1,{UNIT_BLOCK},3,{UNIT_BLOCK},4412");
    let LogEvent::EffectChanged(effect) = parse(&line) else {
        panic!("expected EffectChanged");
    };
    assert_eq!(effect.change_type, EffectChangeType::Faded);
    assert_eq!(effect.target.unwrap().unit_id, "3");
    assert_eq!(effect.player_initiated_remove_cast_track_id, Some(4412));
}

// BEGIN_CAST / END_CAST
#[test]
fn test_parse_begin_cast() {
    let line = format!("300,BEGIN_CAST,0,F,55,28988,4021667,{UNIT_BLOCK},*");
    let LogEvent::BeginCast(cast) = parse(&line) else {
        panic!("expected BeginCast");
    };
    assert!(!cast.channeled);
    assert_eq!(cast.ability_id, 28988);
    assert_eq!(cast.source.unit_id, "4021667");
}

#[test]
fn test_parse_end_cast_variants() {
    let LogEvent::EndCast(done) = parse("301,END_CAST,COMPLETED,55,28988") else {
        panic!("expected EndCast");
    };
    assert_eq!(done.result, CastResult::Completed);
    assert_eq!(done.interrupting_ability_id, None);

    let LogEvent::EndCast(cut) = parse("302,END_CAST,INTERRUPTED,56,28988,12345,7") else {
        panic!("expected EndCast");
    };
    assert_eq!(cut.result, CastResult::Interrupted);
    assert_eq!(cut.interrupting_ability_id, Some(12345));
    assert_eq!(cut.interrupting_unit_id.as_deref(), Some("7"));
}

// ABILITY_INFO / EFFECT_INFO
#[test]
fn test_parse_ability_info() {
    let LogEvent::AbilityInfo(info) =
        parse(r#"5,ABILITY_INFO,23234,"Flames of Oblivion","/esoui/art/icons/ability.dds",T,T"#)
    else {
        panic!("expected AbilityInfo");
    };
    assert_eq!(info.ability_id, 23234);
    assert_eq!(info.name, "Flames of Oblivion");
    assert!(info.is_player_ability);
}

#[test]
fn test_parse_effect_info_optional_synergy() {
    let LogEvent::EffectInfo(plain) = parse("6,EFFECT_INFO,61665,BUFF,NONE,DEFAULT") else {
        panic!("expected EffectInfo");
    };
    assert_eq!(plain.synergy_ability_id, None);

    let LogEvent::EffectInfo(syn) = parse("6,EFFECT_INFO,61665,BUFF,NONE,DEFAULT,48040") else {
        panic!("expected EffectInfo");
    };
    assert_eq!(syn.synergy_ability_id, Some(48040));
}

// PLAYER_INFO
#[test]
fn test_parse_player_info_lists() {
    let line = "7,PLAYER_INFO,1,[142210,142079],[1,2],[[HEAD,94779,T,16,ARMOR_DIVINES,LEGENDARY,243,NONE,0,F,NONE],[CHEST,94780,F,50,ARMOR_IMPENETRABLE,EPIC,0]],[23234,24326],[]";
    let LogEvent::PlayerInfo(info) = parse(line) else {
        panic!("expected PlayerInfo");
    };
    assert_eq!(info.unit_id, "1");
    assert_eq!(info.effect_ids, vec![142210, 142079]);
    assert_eq!(info.effect_stacks, vec![1, 2]);
    assert_eq!(info.gear.len(), 2);
    assert_eq!(info.gear[0].slot, "HEAD");
    assert!(info.gear[0].is_champion);
    assert_eq!(info.gear[0].set_id, 243);
    assert_eq!(info.gear[1].quality, "EPIC");
    assert_eq!(info.front_bar, vec![23234, 24326]);
    assert!(info.back_bar.is_empty());
}

#[test]
fn test_parse_player_info_short_gear_piece_fails() {
    let line = "7,PLAYER_INFO,1,[],[],[[HEAD,94779,T]],[],[]";
    let err = LogParser::new().parse_line(line).unwrap_err();
    assert!(matches!(
        err,
        LineError::Decode(DecodeError::InvalidField { name: "gear", .. })
    ));
}

// Zone / content
#[test]
fn test_parse_zone_and_map() {
    let LogEvent::ZoneChanged(zone) = parse(r#"8,ZONE_CHANGED,1000,"Sunspire",VETERAN"#) else {
        panic!("expected ZoneChanged");
    };
    assert_eq!(zone.zone_id, 1000);
    assert_eq!(zone.name, "Sunspire");
    assert_eq!(zone.difficulty, "VETERAN");

    let LogEvent::MapChanged(map) = parse(r#"9,MAP_CHANGED,1427,"Sunspire","sunspire/sunspire_base""#) else {
        panic!("expected MapChanged");
    };
    assert_eq!(map.texture, "sunspire/sunspire_base");
}

#[test]
fn test_parse_endless_dungeon_events() {
    assert!(matches!(
        parse("10,ENDLESS_DUNGEON_BEGIN,2,1000,F"),
        LogEvent::EndlessDungeonBegin(EndlessDungeonBeginEntry { dungeon_id: 2, flag: false, .. })
    ));
    assert!(matches!(
        parse("11,ENDLESS_DUNGEON_STAGE_END,2,5000"),
        LogEvent::EndlessDungeonStageEnd(_)
    ));
    assert!(matches!(
        parse("12,ENDLESS_DUNGEON_BUFF_ADDED,2,200904"),
        LogEvent::EndlessDungeonBuffAdded(EndlessDungeonBuffEntry { ability_id: 200904, .. })
    ));
    assert!(matches!(
        parse("13,ENDLESS_DUNGEON_BUFF_REMOVED,2,200904"),
        LogEvent::EndlessDungeonBuffRemoved(_)
    ));
    assert!(matches!(
        parse("14,ENDLESS_DUNGEON_END,2,900000,T"),
        LogEvent::EndlessDungeonEnd(EndlessDungeonEndEntry { success: Some(true), .. })
    ));
}

#[test]
fn test_parse_trial_events() {
    assert!(matches!(
        parse("1,TRIAL_INIT,18,T,F,0,0,F,0"),
        LogEvent::TrialInit(TrialInitEntry { trial_id: 18, in_progress: true, .. })
    ));
    assert!(matches!(parse("2,BEGIN_TRIAL,18,1000"), LogEvent::BeginTrial(_)));
    assert!(matches!(
        parse("3,END_TRIAL,18,3600000,T,126000,36"),
        LogEvent::EndTrial(EndTrialEntry { final_score: 126000, success: true, .. })
    ));
}

#[test]
fn test_parse_markers() {
    assert_eq!(
        parse("17,BEGIN_COMBAT"),
        LogEvent::BeginCombat(MarkerEntry { line_number: 17 })
    );
    assert_eq!(parse("18,END_COMBAT").event_type(), "END_COMBAT");
    assert_eq!(parse("19,END_LOG").line_number(), 19);
}

#[test]
fn test_parse_begin_log() {
    let LogEvent::BeginLog(begin) =
        parse(r#"0,BEGIN_LOG,1700000000000,15,"NA Megaserver","en","eso.live.9.2.7""#)
    else {
        panic!("expected BeginLog");
    };
    assert_eq!(begin.log_version, 15);
    assert_eq!(begin.server, "NA Megaserver");
}

// Failures
#[test]
fn test_parse_unknown_event_type() {
    let err = LogParser::new().parse_line("50,SOMETHING_NEW,1,2").unwrap_err();
    assert_eq!(
        err,
        LineError::UnknownEventType {
            line_number: 50,
            token: "SOMETHING_NEW".to_string()
        }
    );
}

#[test]
fn test_parse_invalid_lines() {
    let parser = LogParser::new();
    assert!(matches!(
        parser.parse_line("invalid,line,with,wrong,format"),
        Err(LineError::Lex(_))
    ));
    assert!(matches!(parser.parse_line(""), Err(LineError::Lex(LexError::Empty))));
    assert!(parser.parse_line_opt("   ").is_none());
}

#[test]
fn test_every_registered_type_has_matching_token() {
    for token in registered_event_types() {
        let decoder = lookup_decoder(token).unwrap();
        assert_eq!(decoder.event_type, token);
        assert!(is_registered(token));
    }
    assert!(!is_registered("SOMETHING_NEW"));
}
