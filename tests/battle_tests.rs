use dw_battle_sim::battle::{resolve_battle, BattleState, Winner};
use dw_battle_sim::model::{Armor, AttackAbility, Hero, Monster, Spell, SupportAbility};
use dw_battle_sim::policy::hero::run_hero_turn;
use dw_battle_sim::policy::monster::run_monster_turn;
use dw_battle_sim::policy::{choose_action, HeroAction};
use dw_battle_sim::rng::ScriptedRng;
use dw_battle_sim::settings::Settings;

fn make_hero(hp: i32, attack: u32, defense: u32, agility: u32) -> Hero {
    Hero {
        hp,
        max_hp: None,
        attack,
        strength: None,
        defense,
        agility,
        mp: 0,
        spells: Vec::new(),
        armor: Armor::None,
        fairy_flute: false,
        herbs: 0,
        fairy_water: 0,
    }
}

fn make_monster(name: &str, hp: i32, attack: u32, defense: u32, agility: u32) -> Monster {
    Monster::basic(name, hp, attack, defense, agility, 5)
}

#[test]
fn hero_acts_right_after_an_ambush() {
    let hero = make_hero(30, 100, 20, 1);
    let slime = make_monster("Slime", 5, 10, 0, 255);
    // hero byte 0, monster byte 253, then everything rolls mid-range
    let mut rng = ScriptedRng::with_fallback(vec![0.0, 0.99], 0.5);
    let result = resolve_battle(&hero, &slime, &Settings::default(), &mut rng);

    assert_eq!(result.winner, Winner::Hero);
    assert_eq!(result.rounds, 1);
    assert_eq!(result.log[0], "Slime ambushes!");
    assert_eq!(result.log[1], "Slime attacks for 0 damage.");
    assert!(result.log[2].starts_with("Hero attacks for"), "{:?}", result.log);
    assert_eq!(result.log[3], "Slime is defeated.");
    // 140 intro + 50 ambush + 130 monster attack + 120 hero attack + 200 outro
    assert_eq!(result.time_frames, 640);
    assert_eq!(result.xp_gained, 5);
}

#[test]
fn ambush_timeline_adds_up_with_flat_costs() {
    let hero = make_hero(30, 100, 20, 1);
    let slime = make_monster("Slime", 5, 10, 0, 255);
    let settings = Settings::uniform(10);
    let mut rng = ScriptedRng::with_fallback(vec![0.0, 0.99], 0.5);
    let result = resolve_battle(&hero, &slime, &settings, &mut rng);

    assert_eq!(result.winner, Winner::Hero);
    // monster attack + hero attack, no intro, ambush or outro cost
    assert_eq!(result.time_frames, 20);
    assert_eq!(result.xp_per_minute, 900.0);
}

#[test]
fn lethal_ambush_ends_the_battle_before_the_hero_moves() {
    let hero = make_hero(1, 100, 0, 0);
    let knight = make_monster("Knight", 50, 60, 40, 255);
    let mut rng = ScriptedRng::with_fallback(vec![0.0, 0.99], 0.5);
    let result = resolve_battle(&hero, &knight, &Settings::default(), &mut rng);

    assert_eq!(result.winner, Winner::Monster);
    assert_eq!(result.rounds, 0);
    assert_eq!(result.hero_hp, 0);
    assert_eq!(result.xp_gained, 0);
    assert_eq!(result.xp_per_minute, 0.0);
    assert!(result.log.iter().all(|line| !line.starts_with("Hero")));
}

#[test]
fn flute_forces_a_full_asleep_turn() {
    let mut hero = make_hero(100, 100, 40, 255);
    hero.fairy_flute = true;
    let golem = Monster::basic("Golem", 70, 120, 60, 10, 255);
    // mid-range draws never wake the golem (needs < 1/3)
    let mut rng = ScriptedRng::with_fallback(vec![0.99, 0.99], 0.5);
    let result = resolve_battle(&hero, &golem, &Settings::default(), &mut rng);

    assert_eq!(result.log[0], "Hero plays the Fairy Flute!");
    assert_eq!(result.log[1], "Golem is asleep.");
    assert_eq!(result.winner, Winner::Hero);
    assert!(result.log.iter().all(|line| !line.starts_with("Golem attacks")));
}

#[test]
fn sleeping_hero_skips_the_first_turn_without_a_roll() {
    let hero = make_hero(50, 20, 20, 10);
    let monster = make_monster("Wizard", 60, 10, 100, 10);
    let settings = Settings::default();
    let mut state = BattleState::new(&hero, &monster, &settings);
    state.hero.sleep.fall_asleep();

    let mut rng = ScriptedRng::new(vec![0.0]);
    let before = state.time_frames;
    run_hero_turn(&mut state, &settings, &mut rng);
    assert_eq!(rng.draws(), 0);
    assert!(state.hero.sleep.asleep);
    assert_eq!(state.time_frames - before, settings.hero_sleep_time);
    assert_eq!(state.log.log_lines(), ["Hero is asleep.".to_string()]);

    // second turn rolls 0.0 < 0.5 and acts in the same turn
    run_hero_turn(&mut state, &settings, &mut rng);
    assert!(!state.hero.sleep.asleep);
    assert_eq!(state.log.log_lines()[1], "Hero wakes up.");
    assert_eq!(state.log.log_lines().len(), 3);
}

#[test]
fn stopspelled_monster_casts_cost_less() {
    let hero = make_hero(80, 50, 40, 30);
    let mut wizard = make_monster("Wizard", 60, 40, 40, 30);
    wizard.attack_ability = AttackAbility::Hurt;
    wizard.attack_chance = 1.0;
    let settings = Settings::default();

    let mut blocked = BattleState::new(&hero, &wizard, &settings);
    blocked.monster.stopspelled = true;
    let start = blocked.time_frames;
    run_monster_turn(&mut blocked, &settings, &mut ScriptedRng::new(vec![0.0]));
    let blocked_cost = blocked.time_frames - start;
    assert_eq!(blocked.hero.hp, 80);
    assert_eq!(
        blocked.log.log_lines(),
        ["Wizard tries to cast HURT, but is stopspelled.".to_string()]
    );

    let mut free = BattleState::new(&hero, &wizard, &settings);
    let start = free.time_frames;
    run_monster_turn(&mut free, &settings, &mut ScriptedRng::new(vec![0.0, 0.0]));
    let cast_cost = free.time_frames - start;
    assert_eq!(free.hero.hp, 77);
    assert_eq!(
        free.log.log_lines(),
        ["Wizard casts HURT for 3 damage.".to_string()]
    );

    assert!(blocked_cost < cast_cost);
    assert_eq!(cast_cost - blocked_cost, settings.stopspelled_spell_reduction);
}

#[test]
fn stopspelled_support_spell_is_announced_and_cheaper() {
    let hero = make_hero(80, 50, 40, 30);
    let mut wolflord = make_monster("Wolflord", 38, 50, 36, 60);
    wolflord.support_ability = SupportAbility::Sleep;
    wolflord.support_chance = 1.0;
    let settings = Settings::default();
    let mut state = BattleState::new(&hero, &wolflord, &settings);
    state.monster.stopspelled = true;
    let start = state.time_frames;
    run_monster_turn(&mut state, &settings, &mut ScriptedRng::new(vec![0.0]));

    assert!(!state.hero.sleep.asleep);
    assert!(state.time_frames - start < settings.enemy_spell_time);
    assert_eq!(
        state.log.log_lines(),
        ["Wolflord tries to cast SLEEP, but is stopspelled.".to_string()]
    );
}

#[test]
fn stopspelled_hero_falls_back_to_the_sword() {
    let mut hero = make_hero(80, 50, 40, 30);
    hero.spells = vec![Spell::Hurtmore, Spell::Sleep];
    hero.mp = 30;
    let monster = make_monster("Goldman", 50, 48, 40, 26);
    let mut state = BattleState::new(&hero, &monster, &Settings::default());
    assert_ne!(choose_action(&state, &Settings::default()), HeroAction::Attack);
    state.hero.stopspelled = true;
    assert_eq!(choose_action(&state, &Settings::default()), HeroAction::Attack);
}

#[test]
fn healing_never_overfills() {
    let mut hero = make_hero(5, 20, 0, 10);
    hero.max_hp = Some(10);
    hero.spells = vec![Spell::Healmore];
    hero.mp = 8;
    let knight = make_monster("Knight", 60, 60, 50, 10);
    let settings = Settings::default();
    let mut state = BattleState::new(&hero, &knight, &settings);

    run_hero_turn(&mut state, &settings, &mut ScriptedRng::new(vec![0.99]));
    assert_eq!(state.hero.hp, 10);
    assert_eq!(state.hero.mp, 0);
    assert_eq!(state.mp_spent, 8);
    assert_eq!(
        state.log.log_lines(),
        ["Hero casts HEALMORE and heals 5 HP.".to_string()]
    );
}

#[test]
fn hero_runs_when_out_of_heals() {
    let hero = make_hero(5, 10, 0, 255);
    let knight = make_monster("Knight", 60, 60, 50, 0);
    let settings = Settings {
        hero_may_flee: true,
        ..Settings::default()
    };
    let mut rng = ScriptedRng::with_fallback(vec![0.99, 0.5], 0.5);
    let result = resolve_battle(&hero, &knight, &settings, &mut rng);

    assert_eq!(result.winner, Winner::HeroFled);
    assert_eq!(result.log, vec!["Hero runs away!".to_string()]);
    // 140 intro + 120 run + 45 flight outro
    assert_eq!(result.time_frames, 305);
    assert_eq!(result.xp_gained, 0);
    assert_eq!(result.hero_hp, 5);
}

#[test]
fn erdrick_armor_trims_dragon_breath() {
    let mut hero = make_hero(200, 140, 100, 0);
    hero.armor = Armor::Erdrick;
    let mut dragon = make_monster("Dragon", 136, 88, 74, 255);
    dragon.attack_ability = AttackAbility::BigBreath;
    dragon.attack_chance = 1.0;
    // ambush, breath roll 0.0 -> 65, mitigated to 42
    let mut rng = ScriptedRng::with_fallback(vec![0.0, 0.99, 0.0, 0.0], 0.5);
    let result = resolve_battle(&hero, &dragon, &Settings::default(), &mut rng);
    assert_eq!(result.log[1], "Dragon uses BIG BREATH for 42 damage.");
}
