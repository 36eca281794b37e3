//! DNA lab: animated walk-throughs of base pairing, transcription,
//! translation and point mutations.

use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::genetics::{
    anticodon, codons, complement, consequence, letters, protein_letters, strand, transcribe, translate, AminoAcid,
    Base, Mutation, Residue,
};
use crate::games::{banner, chrome, help_line, sep, Game};
use crate::input::KeySet;
use crate::sim::{Round, CANVAS_HEIGHT, CANVAS_WIDTH, FPS};
use crate::ui::surface::Surface;

const LAB_COLOR: Color = Color::Rgb(0, 255, 170);
const TEXT: Color = Color::Rgb(220, 220, 230);
const DIM: Color = Color::Rgb(110, 110, 140);

/// Frames per base in the strand-building animations.
const BASE_FRAMES: u32 = FPS / 2;
/// Frames per ribosome step.
const RIBOSOME_FRAMES: u32 = 2 * FPS;
/// Time on the finished picture before it replays.
const HOLD_FRAMES: u32 = 3 * FPS;

const BASE_RADIUS: f32 = 15.0;
const SPACING: f32 = 40.0;
const LEFT: f32 = 120.0;
const RANDOM_LEN: usize = 12;

/// mRNA AUG UCU UUU UAA: Met-Ser-Phe, then stop.
const GENE: &str = "TACAGAAAAATT";
/// mRNA AUG UUU GGC CAU UAA: Met-Phe-Gly-His, then stop.
const MUTATION_GENE: &str = "TACAAACCGGTAATT";
const MUTATION_SITE: usize = 5;

/// One animated page. Everything drawn is a function of how many steps
/// have played.
trait Experiment {
    fn name(&self) -> &'static str;
    fn steps(&self) -> usize;
    fn frames_per_step(&self) -> u32 {
        BASE_FRAMES
    }
    fn caption(&self, step: usize) -> String;
    /// `progress` is how far into the next step the animation is, 0 to 1.
    fn draw(&self, s: &mut Surface, step: usize, progress: f32);
    /// Page keys. Returns true when the experiment changed and must replay.
    fn handle_key(&mut self, _code: KeyCode) -> bool {
        false
    }
    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Playback {
    step: usize,
    timer: u32,
}

impl Playback {
    fn tick(&mut self, steps: usize, every: u32) {
        self.timer += 1;
        if self.step < steps {
            if self.timer >= every {
                self.timer = 0;
                self.step += 1;
            }
        } else if self.timer >= HOLD_FRAMES {
            *self = Playback::default();
        }
    }

    fn progress(&self, every: u32) -> f32 {
        (self.timer as f32 / every.max(1) as f32).min(1.0)
    }
}

fn base_x(i: usize) -> f32 {
    LEFT + i as f32 * SPACING
}

fn draw_base(s: &mut Surface, x: f32, y: f32, base: Base) {
    s.circle(x, y, BASE_RADIUS, '●', base.color());
    s.text(
        x,
        y,
        &base.letter().to_string(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    );
}

fn draw_strand(s: &mut Surface, bases: &[Base], y: f32) {
    for (i, b) in bases.iter().enumerate() {
        draw_base(s, base_x(i), y, *b);
    }
}

/// Hydrogen bonds between two stacked bases; C-G pairs draw heavier.
fn draw_bond(s: &mut Surface, x: f32, top: f32, bottom: f32, base: Base) {
    let glyph = if base.bonds() == 3 { '┃' } else { '│' };
    s.line(x, top + BASE_RADIUS, x, bottom - BASE_RADIUS, glyph, DIM);
}

fn outline(s: &mut Surface, x: f32, y: f32, w: f32, h: f32, color: Color) {
    s.line(x, y, x + w, y, '─', color);
    s.line(x, y + h, x + w, y + h, '─', color);
    s.line(x, y, x, y + h, '│', color);
    s.line(x + w, y, x + w, y + h, '│', color);
}

fn label(s: &mut Surface, x: f32, y: f32, text: &str, color: Color) {
    s.text(x, y, text, Style::default().fg(color));
}

fn random_strand(rng: &mut StdRng) -> Vec<Base> {
    (0..RANDOM_LEN).map(|_| Base::DNA[rng.gen_range(0..Base::DNA.len())]).collect()
}

// ── Base pairing ──

struct Pairing {
    template: Vec<Base>,
    rng: StdRng,
}

impl Pairing {
    const TOP: f32 = 220.0;
    const BOTTOM: f32 = 320.0;
    const POOL: f32 = 500.0;

    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let template = random_strand(&mut rng);
        Self { template, rng }
    }

    /// Partner bases in place after `step` steps.
    fn paired(&self, step: usize) -> Vec<Base> {
        complement(&self.template[..step.min(self.template.len())])
    }
}

impl Experiment for Pairing {
    fn name(&self) -> &'static str {
        "Base pairing"
    }

    fn steps(&self) -> usize {
        self.template.len()
    }

    fn caption(&self, step: usize) -> String {
        if step >= self.steps() {
            format!(
                "Double helix: {} pairs with {}",
                letters(&self.template),
                letters(&complement(&self.template))
            )
        } else {
            format!("A pairs with T (2 bonds), C pairs with G (3 bonds) │ paired {}/{}", step, self.steps())
        }
    }

    fn draw(&self, s: &mut Surface, step: usize, progress: f32) {
        label(s, 10.0, Self::TOP, "strand", TEXT);
        label(s, 10.0, Self::BOTTOM, "partner", TEXT);
        draw_strand(s, &self.template, Self::TOP);
        for (i, b) in self.paired(step).into_iter().enumerate() {
            draw_bond(s, base_x(i), Self::TOP, Self::BOTTOM, b);
            draw_base(s, base_x(i), Self::BOTTOM, b);
        }
        if let Some(&next) = self.template.get(step) {
            let x = base_x(step);
            s.ring(x, Self::BOTTOM, BASE_RADIUS + 6.0, '·', DIM);
            let y = Self::POOL + (Self::BOTTOM - Self::POOL) * progress;
            draw_base(s, x, y, next.dna_pair());
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.template = random_strand(&mut self.rng);
                log::debug!("lab: new strand {}", letters(&self.template));
                true
            }
            _ => false,
        }
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("N", "New strand")]
    }
}

// ── Transcription ──

struct Transcription {
    template: Vec<Base>,
}

impl Transcription {
    const CODING: f32 = 100.0;
    const TEMPLATE: f32 = 170.0;
    const MRNA: f32 = 290.0;

    fn new(template: Vec<Base>) -> Self {
        Self { template }
    }

    /// mRNA made after `step` steps.
    fn mrna_at(&self, step: usize) -> Vec<Base> {
        transcribe(&self.template[..step.min(self.template.len())])
    }
}

impl Experiment for Transcription {
    fn name(&self) -> &'static str {
        "Transcription"
    }

    fn steps(&self) -> usize {
        self.template.len()
    }

    fn caption(&self, step: usize) -> String {
        let mrna = self.mrna_at(step);
        if step >= self.steps() {
            format!("mRNA {} leaves with {} codons", letters(&mrna), mrna.len() / 3)
        } else {
            format!("RNA polymerase reads the template, U pairs with A │ mRNA {}", letters(&mrna))
        }
    }

    fn draw(&self, s: &mut Surface, step: usize, _progress: f32) {
        label(s, 10.0, Self::CODING, "coding", TEXT);
        label(s, 10.0, Self::TEMPLATE, "template", TEXT);
        label(s, 10.0, Self::MRNA, "mRNA", TEXT);

        let reading = step < self.template.len();
        if reading {
            let x = base_x(step) - 25.0;
            let top = Self::TEMPLATE - 40.0;
            s.fill_rect(x, top, 50.0, Self::MRNA - top + 40.0, '░', Color::Rgb(255, 165, 0));
            label(s, x, top - 20.0, "RNA Pol", Color::Rgb(255, 165, 0));
        }

        let coding = complement(&self.template);
        for (i, b) in coding.iter().enumerate() {
            // The helix is open where the polymerase sits
            if !(reading && i == step) {
                draw_bond(s, base_x(i), Self::CODING, Self::TEMPLATE, *b);
            }
        }
        draw_strand(s, &coding, Self::CODING);
        draw_strand(s, &self.template, Self::TEMPLATE);

        let mrna = self.mrna_at(step);
        draw_strand(s, &mrna, Self::MRNA);
        for c in 0..mrna.len() / 3 {
            outline(s, base_x(c * 3) - 20.0, Self::MRNA - 25.0, SPACING * 3.0, 50.0, Color::White);
        }
    }
}

// ── Translation ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    TrnaEntering,
    Adding,
    Moving,
}

impl Phase {
    const ALL: [Phase; 4] = [Phase::Waiting, Phase::TrnaEntering, Phase::Adding, Phase::Moving];

    fn label(self) -> &'static str {
        match self {
            Phase::Waiting => "WAITING",
            Phase::TrnaEntering => "TRNA ENTERING",
            Phase::Adding => "ADDING AMINO ACID",
            Phase::Moving => "MOVING",
        }
    }
}

struct Translation {
    mrna: Vec<Base>,
    /// Everything the ribosome will read, stop codon included
    chain: Vec<Residue>,
}

impl Translation {
    const MRNA: f32 = 150.0;
    const TRNA: f32 = 290.0;
    const CHAIN: f32 = 500.0;
    const SPAN: f32 = 130.0;

    fn new(mrna: Vec<Base>) -> Self {
        let chain = translate(&mrna);
        Self { mrna, chain }
    }

    fn codon_x(i: usize) -> f32 {
        90.0 + i as f32 * Self::SPAN
    }

    /// Codon under the ribosome and what it is doing, or `None` once the
    /// chain is released.
    fn at(&self, step: usize) -> Option<(usize, Phase)> {
        (step < self.steps()).then(|| (step / Phase::ALL.len(), Phase::ALL[step % Phase::ALL.len()]))
    }

    fn codon(&self, i: usize) -> Option<[Base; 3]> {
        codons(&self.mrna).nth(i)
    }

    /// Amino acids joined after `step` steps.
    fn chain_at(&self, step: usize) -> Vec<AminoAcid> {
        let joined = match self.at(step) {
            None => self.chain.len(),
            Some((c, Phase::Adding | Phase::Moving)) => c + 1,
            Some((c, _)) => c,
        };
        self.chain[..joined]
            .iter()
            .filter_map(|r| match r {
                Residue::Amino(aa) => Some(*aa),
                Residue::Stop => None,
            })
            .collect()
    }
}

impl Experiment for Translation {
    fn name(&self) -> &'static str {
        "Translation"
    }

    fn steps(&self) -> usize {
        self.chain.len() * Phase::ALL.len()
    }

    fn frames_per_step(&self) -> u32 {
        RIBOSOME_FRAMES
    }

    fn caption(&self, step: usize) -> String {
        let Some((c, phase)) = self.at(step) else {
            let names: Vec<&str> = self.chain_at(step).iter().map(|aa| aa.name()).collect();
            return format!("Released {}: {}", protein_letters(&self.chain), names.join("-"));
        };
        let codon = self.codon(c).map(|b| letters(&b)).unwrap_or_default();
        let residue = self.chain[c];
        match (phase, residue) {
            (Phase::Waiting, _) => format!("Ribosome waits on codon {} ({})", c + 1, codon),
            (Phase::TrnaEntering, Residue::Stop) => format!("Stop codon {}: no tRNA matches", codon),
            (Phase::TrnaEntering, Residue::Amino(aa)) => {
                let ac = self.codon(c).map(|b| letters(&anticodon(b))).unwrap_or_default();
                format!("tRNA with anticodon {} brings {}", ac, aa.name())
            }
            (Phase::Adding, Residue::Stop) => "Release factor frees the chain".to_string(),
            (Phase::Adding, Residue::Amino(aa)) => format!("{} joins the chain", aa.name()),
            (Phase::Moving, _) => "Ribosome moves one codon along".to_string(),
        }
    }

    fn draw(&self, s: &mut Surface, step: usize, progress: f32) {
        let brown = Color::Rgb(139, 69, 19);
        let current = self.at(step);

        if let Some((c, phase)) = current {
            let shift = if phase == Phase::Moving { progress * Self::SPAN } else { 0.0 };
            let x = Self::codon_x(c) + shift;
            s.circle(x, Self::MRNA + 10.0, 55.0, '▓', brown);
            s.circle(x, Self::MRNA + 55.0, 35.0, '▓', brown);
            label(s, x - 35.0, Self::MRNA - 85.0, "Ribosome", TEXT);
            label(s, x - 35.0, Self::MRNA - 65.0, phase.label(), LAB_COLOR);
        }

        for (i, codon) in codons(&self.mrna).enumerate() {
            let x = Self::codon_x(i);
            outline(s, x - 50.0, Self::MRNA - 20.0, 100.0, 40.0, Color::White);
            for (j, b) in codon.iter().enumerate() {
                draw_base(s, x - 30.0 + j as f32 * 30.0, Self::MRNA, *b);
            }
        }

        if let Some((c, phase @ (Phase::TrnaEntering | Phase::Adding))) = current {
            if let (Some(codon), Residue::Amino(aa)) = (self.codon(c), self.chain[c]) {
                let rise = if phase == Phase::TrnaEntering { (1.0 - progress) * 120.0 } else { 0.0 };
                let x = Self::codon_x(c) - 40.0;
                let y = Self::TRNA + rise;
                let gold = Color::Rgb(255, 215, 0);
                s.line(x, y, x + 80.0, y, '━', gold);
                s.line(x + 80.0, y, x + 80.0, y + 100.0, '┃', gold);
                label(s, x, y + 20.0, &letters(&anticodon(codon)), gold);
                if phase == Phase::TrnaEntering {
                    s.circle(x + 80.0, y + 120.0, 22.0, '●', aa.color());
                    s.text(
                        x + 80.0,
                        y + 120.0,
                        &aa.letter().to_string(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    );
                }
            }
        }

        for (i, aa) in self.chain_at(step).into_iter().enumerate() {
            let x = Self::codon_x(i);
            if i > 0 {
                s.line(x - Self::SPAN + 28.0, Self::CHAIN, x - 28.0, Self::CHAIN, '═', DIM);
            }
            s.circle(x, Self::CHAIN, 28.0, '●', aa.color());
            s.text(
                x,
                Self::CHAIN,
                &aa.letter().to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            );
            label(s, x - 45.0, Self::CHAIN + 45.0, aa.name(), TEXT);
        }
    }
}

// ── Point mutations ──

struct Mutations {
    template: Vec<Base>,
    site: usize,
    /// Which of the three other bases the substitution uses
    swap: usize,
}

impl Mutations {
    const BAND: f32 = 190.0;

    fn new(template: Vec<Base>, site: usize) -> Self {
        let site = site.min(template.len().saturating_sub(1));
        Self { template, site, swap: 0 }
    }

    fn alternatives(&self) -> Vec<Base> {
        let original = self.template.get(self.site).copied();
        Base::DNA.into_iter().filter(|b| Some(*b) != original).collect()
    }

    fn rows(&self) -> [Mutation; 3] {
        let alternatives = self.alternatives();
        let swapped = alternatives[self.swap % alternatives.len()];
        [
            Mutation::Insertion { at: self.site, base: Base::G },
            Mutation::Deletion { at: self.site },
            Mutation::Substitution { at: self.site, base: swapped },
        ]
    }

    fn describe(&self, m: &Mutation) -> String {
        let n = self.site + 1;
        let original = self.template.get(self.site).map_or('?', |b| b.letter());
        match m {
            Mutation::Insertion { base, .. } => format!("Insertion of {} before base {}", base.letter(), n),
            Mutation::Deletion { .. } => format!("Deletion of base {} ({})", n, original),
            Mutation::Substitution { base, .. } => {
                format!("Substitution {}→{} at base {}", original, base.letter(), n)
            }
        }
    }
}

impl Experiment for Mutations {
    fn name(&self) -> &'static str {
        "Mutations"
    }

    fn steps(&self) -> usize {
        self.template.len() + 1
    }

    fn caption(&self, step: usize) -> String {
        let original = protein_letters(&translate(&transcribe(&self.template)));
        if step >= self.steps() {
            let verdicts: Vec<String> = self
                .rows()
                .iter()
                .map(|m| format!("{} {}", m.label(), consequence(&self.template, m).label()))
                .collect();
            format!("Protein {} │ {}", original, verdicts.join(", "))
        } else {
            format!("Transcribing three mutated copies of {} (protein {})", letters(&self.template), original)
        }
    }

    fn draw(&self, s: &mut Surface, step: usize, _progress: f32) {
        let done = step >= self.steps();
        for (k, m) in self.rows().iter().enumerate() {
            let y0 = 25.0 + k as f32 * Self::BAND;
            label(s, 10.0, y0, &self.describe(m), Color::Rgb(255, 215, 0));

            let dna = m.apply(&self.template);
            label(s, 10.0, y0 + 50.0, "DNA", TEXT);
            draw_strand(s, &dna, y0 + 50.0);
            s.ring(base_x(self.site), y0 + 50.0, BASE_RADIUS + 8.0, '○', Color::Yellow);

            label(s, 10.0, y0 + 105.0, "mRNA", TEXT);
            draw_strand(s, &transcribe(&dna[..step.min(dna.len())]), y0 + 105.0);

            if done {
                let protein = protein_letters(&translate(&transcribe(&dna)));
                let verdict = consequence(&self.template, m);
                label(
                    s,
                    LEFT - 20.0,
                    y0 + 145.0,
                    &format!("protein {}  {}", protein, verdict.label()),
                    LAB_COLOR,
                );
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        let last = self.template.len().saturating_sub(1);
        match code {
            KeyCode::Left => self.site = self.site.saturating_sub(1),
            KeyCode::Right => self.site = (self.site + 1).min(last),
            KeyCode::Up => self.swap = (self.swap + 1) % 3,
            KeyCode::Down => self.swap = (self.swap + 2) % 3,
            _ => return false,
        }
        true
    }

    fn hints(&self) -> &'static [(&'static str, &'static str)] {
        &[("←→", "Site"), ("↑↓", "Base")]
    }
}

// ── The tab ──

struct Slot {
    experiment: Box<dyn Experiment>,
    playback: Playback,
}

pub struct Lab {
    slots: Vec<Slot>,
    page: usize,
    round: Round<()>,
}

impl Lab {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        let gene = strand(GENE);
        let experiments: Vec<Box<dyn Experiment>> = vec![
            Box::new(Pairing::new(seed)),
            Box::new(Transcription::new(gene.clone())),
            Box::new(Translation::new(transcribe(&gene))),
            Box::new(Mutations::new(strand(MUTATION_GENE), MUTATION_SITE)),
        ];
        let slots = experiments
            .into_iter()
            .map(|experiment| Slot {
                experiment,
                playback: Playback::default(),
            })
            .collect();
        let mut round = Round::new();
        round.start();
        Self { slots, page: 0, round }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut s = Surface::new(width, height, CANVAS_WIDTH, CANVAS_HEIGHT, Color::Black);
        let slot = &self.slots[self.page];
        let every = slot.experiment.frames_per_step();
        slot.experiment.draw(&mut s, slot.playback.step, slot.playback.progress(every));
        s.into_lines()
    }
}

impl Game for Lab {
    fn update(&mut self, _keys: &KeySet) {
        if !self.round.advancing() {
            return;
        }
        self.round.tick();
        let slot = &mut self.slots[self.page];
        slot.playback.tick(slot.experiment.steps(), slot.experiment.frames_per_step());
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let page = c as usize - '1' as usize;
                if page < self.slots.len() && page != self.page {
                    log::debug!("lab: showing {}", self.slots[page].experiment.name());
                    self.page = page;
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') => self.round.toggle_pause(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.slots[self.page].playback = Playback::default(),
            code => {
                let slot = &mut self.slots[self.page];
                if slot.experiment.handle_key(code) {
                    slot.playback = Playback::default();
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [status_area, field_area, help_area] = chrome(frame, area, "🧬 DNA Lab", LAB_COLOR);

        let mut spans = vec![Span::raw(" ")];
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                spans.push(sep());
            }
            let style = if i == self.page {
                Style::default().fg(LAB_COLOR).add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(DIM)
            };
            spans.push(Span::styled(format!("{} {}", i + 1, slot.experiment.name()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), status_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(field_area);
        let slot = &self.slots[self.page];
        frame.render_widget(
            Paragraph::new(Line::styled(
                format!(" {}", slot.experiment.caption(slot.playback.step)),
                Style::default().fg(TEXT),
            )),
            rows[0],
        );
        let lines = self.render_field(rows[1].width as usize, rows[1].height as usize);
        frame.render_widget(Paragraph::new(lines), rows[1]);

        if self.round.is_paused() {
            banner(frame, help_area, "⏸ PAUSED", Color::Yellow, "Press P to resume");
        } else {
            let mut entries = vec![("1-4", "Experiment")];
            entries.extend_from_slice(slot.experiment.hints());
            entries.extend_from_slice(&[("P", "Pause"), ("R", "Replay"), ("Esc", "Menu")]);
            frame.render_widget(Paragraph::new(help_line(&entries)), help_area);
        }
    }

    fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.playback = Playback::default();
        }
        self.round.restart();
    }

    fn get_score(&self) -> u32 {
        0
    }

    fn is_game_over(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn frames(lab: &mut Lab, n: u32) {
        let keys = KeySet::new(1);
        for _ in 0..n {
            lab.update(&keys);
        }
    }

    fn press(lab: &mut Lab, code: KeyCode) {
        lab.handle_input(KeyEvent::from(code));
    }

    fn step(lab: &Lab) -> usize {
        lab.slots[lab.page].playback.step
    }

    #[test]
    fn test_playback_steps_holds_then_replays() {
        let mut p = Playback::default();
        for _ in 0..BASE_FRAMES * 3 {
            p.tick(3, BASE_FRAMES);
        }
        assert_eq!(p.step, 3);
        for _ in 0..HOLD_FRAMES - 1 {
            p.tick(3, BASE_FRAMES);
        }
        assert_eq!(p.step, 3);
        p.tick(3, BASE_FRAMES);
        assert_eq!(p, Playback::default());
    }

    #[test]
    fn test_only_the_visible_experiment_advances() {
        let mut lab = Lab::with_seed(5);
        frames(&mut lab, BASE_FRAMES * 2);
        assert_eq!(step(&lab), 2);

        press(&mut lab, KeyCode::Char('3'));
        assert_eq!(lab.page, 2);
        assert_eq!(step(&lab), 0);
        frames(&mut lab, RIBOSOME_FRAMES);
        assert_eq!(step(&lab), 1);
        assert_eq!(lab.slots[0].playback.step, 2);

        // Out of range pages are ignored
        press(&mut lab, KeyCode::Char('9'));
        assert_eq!(lab.page, 2);
    }

    #[test]
    fn test_pause_freezes_and_replay_rewinds() {
        let mut lab = Lab::with_seed(5);
        frames(&mut lab, BASE_FRAMES);
        press(&mut lab, KeyCode::Char('p'));
        frames(&mut lab, BASE_FRAMES * 4);
        assert_eq!(step(&lab), 1);
        press(&mut lab, KeyCode::Char('p'));
        frames(&mut lab, BASE_FRAMES);
        assert_eq!(step(&lab), 2);
        press(&mut lab, KeyCode::Char('r'));
        assert_eq!(step(&lab), 0);
    }

    #[test]
    fn test_pairing_builds_the_complement() {
        let p = Pairing::new(1);
        assert_eq!(p.template.len(), RANDOM_LEN);
        assert!(p.paired(0).is_empty());
        let done = p.paired(p.steps());
        assert_eq!(done, complement(&p.template));
        assert!(p.template.iter().zip(&done).all(|(a, b)| a.dna_pair() == *b));
    }

    #[test]
    fn test_new_strand_replays_pairing() {
        let mut lab = Lab::with_seed(8);
        frames(&mut lab, BASE_FRAMES * 3);
        press(&mut lab, KeyCode::Char('n'));
        assert_eq!(step(&lab), 0);
    }

    #[test]
    fn test_transcription_grows_one_base_per_step() {
        let t = Transcription::new(strand(GENE));
        assert_eq!(letters(&t.mrna_at(4)), "AUGU");
        assert_eq!(letters(&t.mrna_at(t.steps())), "AUGUCUUUUUAA");
        assert!(t.caption(t.steps()).contains("4 codons"));
    }

    #[test]
    fn test_translation_phases_and_chain() {
        let t = Translation::new(transcribe(&strand(GENE)));
        assert_eq!(t.steps(), 16);
        assert_eq!(t.at(0), Some((0, Phase::Waiting)));
        assert_eq!(t.at(5), Some((1, Phase::TrnaEntering)));
        assert!(t.chain_at(1).is_empty());
        assert_eq!(t.chain_at(2), vec![AminoAcid::Met]);
        assert!(t.caption(5).contains("AGA"));
        assert!(t.caption(5).contains("Serine"));
        assert!(t.caption(13).contains("no tRNA"));
        assert_eq!(t.at(16), None);
        assert_eq!(t.chain_at(16), vec![AminoAcid::Met, AminoAcid::Ser, AminoAcid::Phe]);
        assert!(t.caption(16).contains("MSF*"));
    }

    #[test]
    fn test_mutation_page_moves_site_and_swaps_base() {
        let mut m = Mutations::new(strand(MUTATION_GENE), MUTATION_SITE);
        assert_eq!(m.alternatives(), vec![Base::C, Base::G, Base::T]);
        assert!(m.handle_key(KeyCode::Up));
        assert_eq!(m.rows()[2], Mutation::Substitution { at: 5, base: Base::G });
        assert!(m.caption(m.steps()).contains("Substitution silent"));

        assert!(m.handle_key(KeyCode::Down));
        assert!(m.caption(m.steps()).contains("Substitution missense"));

        for _ in 0..40 {
            m.handle_key(KeyCode::Right);
        }
        assert_eq!(m.site, MUTATION_GENE.len() - 1);
        assert!(!m.handle_key(KeyCode::Char('x')));
    }

    #[test]
    fn test_every_page_renders() {
        let mut lab = Lab::with_seed(2);
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        for page in ['1', '2', '3', '4'] {
            press(&mut lab, KeyCode::Char(page));
            frames(&mut lab, RIBOSOME_FRAMES * 3);
            terminal.draw(|f| lab.render(f, f.area())).unwrap();
            let text: String = terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect();
            assert!(text.contains("DNA Lab"));
        }
    }
}
