#[derive(Clone, Debug, Default)]
pub struct BattleLogger {
    monster: String,
    log: Vec<String>,
}

impl BattleLogger {
    pub fn new(monster: impl Into<String>) -> Self {
        Self {
            monster: monster.into(),
            log: Vec::new(),
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::trace!(target: "battle", "{line}");
        self.log.push(line);
    }

    pub fn log_ambush(&mut self) {
        self.push(format!("{} ambushes!", self.monster));
    }

    pub fn log_hero_damage(&mut self, verb: &str, damage: i32) {
        self.push(format!("Hero {verb} for {damage} damage."));
    }

    pub fn log_hero_heal(&mut self, source: &str, healed: i32) {
        self.push(format!("Hero {source} and heals {healed} HP."));
    }

    pub fn log_monster_damage(&mut self, verb: &str, damage: i32) {
        self.push(format!("{} {verb} for {damage} damage.", self.monster));
    }

    pub fn log_monster_line(&mut self, rest: &str) {
        self.push(format!("{} {rest}", self.monster));
    }

    pub fn log_defeat(&mut self, hero_lost: bool) {
        if hero_lost {
            self.push("Hero is defeated.");
        } else {
            self.push(format!("{} is defeated.", self.monster));
        }
    }

    pub fn extend(&mut self, lines: impl IntoIterator<Item = String>) {
        self.log.extend(lines);
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn into_lines(self) -> Vec<String> {
        self.log
    }
}
