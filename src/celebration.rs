use rand::Rng;
use std::time::{Duration, Instant};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{picker, util::truncate_to_width};

const SPARKS: [char; 6] = ['*', '+', '✦', '✧', '•', '·'];
const BANNER_DURATION: Duration = Duration::from_millis(2500);
/// Fixed timestep the particles move by per frame, in seconds.
const FRAME_DT: f64 = 0.05;

/// A single glyph of the winner banner
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
    /// Letters of the winner's name fly to a slot and stay there.
    pub target: Option<(f64, f64)>,
}

impl Particle {
    fn spark<R: Rng + ?Sized>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-8.0..-2.0),
            symbol: *picker::pick(&SPARKS, rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(1.0..2.5),
            target: None,
        }
    }

    fn letter(x: f64, y: f64, target: (f64, f64), symbol: char, color_index: usize) -> Self {
        Self {
            x,
            y,
            vel_x: (target.0 - x) * 2.0,
            vel_y: (target.1 - y) * 2.0,
            symbol,
            color_index,
            age: 0.0,
            max_age: BANNER_DURATION.as_secs_f64(),
            target: Some(target),
        }
    }

    pub fn is_letter(&self) -> bool {
        self.target.is_some()
    }

    /// Advances by `dt` seconds; returns false once the particle has expired.
    fn update(&mut self, dt: f64) -> bool {
        match self.target {
            Some((tx, ty)) => {
                let dist = ((tx - self.x).powi(2) + (ty - self.y).powi(2)).sqrt();
                if dist > 0.5 {
                    self.x += self.vel_x * dt;
                    self.y += self.vel_y * dt;
                    self.vel_x = (tx - self.x) * 4.0;
                    self.vel_y = (ty - self.y) * 4.0;
                } else {
                    self.x = tx;
                    self.y = ty;
                    self.vel_x = 0.0;
                    self.vel_y = 0.0;
                }
            }
            None => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += 12.0 * dt;
            }
        }

        self.age += dt;
        self.age < self.max_age
    }
}

/// Banner spelling out the winner, surrounded by sparks
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub label: String,
    started_at: Option<Instant>,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            label: String::new(),
            started_at: None,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start<R: Rng + ?Sized>(&mut self, label: &str, width: u16, height: u16, rng: &mut R) {
        self.particles.clear();
        self.started_at = Some(Instant::now());
        self.width = f64::from(width);
        self.height = f64::from(height);

        let max_letters = usize::from(width.saturating_sub(4)).max(1);
        self.label = truncate_to_width(label, max_letters);

        let centre_x = self.width / 2.0;
        let centre_y = self.height / 2.0;
        let left = centre_x - self.label.width() as f64 / 2.0;
        let color = rng.gen_range(0..7);

        // Slots are measured in terminal columns, so wide glyphs take two.
        let mut column = 0usize;
        for ch in self.label.chars() {
            let slot = left + column as f64;
            column += ch.width().unwrap_or(0);
            if ch == ' ' {
                continue;
            }
            let from = (
                centre_x + rng.gen_range(-12.0..12.0),
                centre_y + rng.gen_range(-6.0..6.0),
            );
            self.particles.push(Particle::letter(
                from.0,
                from.1,
                (slot, centre_y - 1.0),
                ch,
                color,
            ));
        }

        for _ in 0..20 {
            let x = centre_x + rng.gen_range(-15.0..15.0);
            let y = centre_y + rng.gen_range(-4.0..4.0);
            self.particles.push(Particle::spark(x, y, rng));
        }
    }

    /// Call once per frame.
    pub fn update(&mut self) {
        let Some(started_at) = self.started_at else {
            return;
        };
        if started_at.elapsed() >= BANNER_DURATION {
            self.stop();
            return;
        }

        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(FRAME_DT);
            if p.is_letter() {
                return alive;
            }
            let off_screen = p.y > height + 2.0 || p.x < -2.0 || p.x > width + 2.0;
            alive && !off_screen
        });
    }

    pub fn stop(&mut self) {
        self.started_at = None;
        self.particles.clear();
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
