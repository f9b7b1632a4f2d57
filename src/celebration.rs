use rand::seq::SliceRandom;
use rand::Rng;

/// Seconds of animation advanced per ui tick.
const TICK_SECS: f64 = 0.05;

const DROPLET_GLYPHS: [char; 6] = ['•', '◦', '∘', '*', '˚', '💧'];

const BANNERS: [&str; 4] = ["MILESTONE!", "SPLASH!", "CLEAN SWEEP!", "FLOWING!"];

/// One droplet in the milestone splash.
#[derive(Debug, Clone)]
pub struct Droplet {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl Droplet {
    fn new(x: f64, y: f64) -> Self {
        let mut rng = rand::thread_rng();

        Self {
            x,
            y,
            vel_x: rng.gen_range(-6.0..6.0),
            vel_y: rng.gen_range(-9.0..-3.0),
            symbol: *DROPLET_GLYPHS.choose(&mut rng).unwrap_or(&'•'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(1.5..2.5),
        }
    }

    /// Advances the droplet and reports whether it is still alive.
    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += 14.0 * dt;

        self.age += dt;
        self.age < self.max_age
    }
}

/// Splash played when the score crosses the milestone: a banner over the
/// board and a burst of droplets that arc up and rain off screen. Advanced
/// by the ui tick, so it carries no clock of its own.
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<Droplet>,
    pub banner: &'static str,
    pub is_active: bool,
    elapsed: f64,
    duration: f64,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            banner: BANNERS[0],
            is_active: false,
            elapsed: 0.0,
            duration: 2.5,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.elapsed = 0.0;
        self.is_active = true;
        self.width = width as f64;
        self.height = height as f64;
        self.banner = *BANNERS.choose(&mut rng).unwrap_or(&BANNERS[0]);

        let center_x = self.width / 2.0;
        let center_y = self.height / 2.0;
        for _ in 0..30 {
            let offset_x = rng.gen_range(-12.0..12.0);
            let offset_y = rng.gen_range(-3.0..3.0);
            self.particles
                .push(Droplet::new(center_x + offset_x, center_y + offset_y));
        }
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        self.elapsed += TICK_SECS;
        if self.elapsed >= self.duration {
            self.is_active = false;
            self.particles.clear();
            return;
        }

        let width = self.width;
        let height = self.height;
        self.particles.retain_mut(|droplet| {
            let alive = droplet.update(TICK_SECS);
            let off_screen =
                droplet.y > height + 2.0 || droplet.x < -2.0 || droplet.x > width + 2.0;
            alive && !off_screen
        });
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
