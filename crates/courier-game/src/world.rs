//! The tiny planet: its sphere, the props standing on it, and the NPCs
//! wandering between them.

use courier_collision::{ObstacleSet, ObstacleShape};
use courier_config::PlanetConfig;
use courier_manifold::SphereManifold;
use courier_player::AgentState;
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::error::GameError;

/// Props and NPCs keep at least this arc length away from the spawn point.
const SPAWN_CLEARANCE: f64 = 6.0;
/// Give up placing a prop after this many rejected samples.
const MAX_PLACEMENT_ATTEMPTS: u32 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropKind {
    Building,
    LampPost,
    Tree,
}

impl PropKind {
    const ALL: [PropKind; 3] = [PropKind::Building, PropKind::LampPost, PropKind::Tree];

    /// Ground footprint radius used when spacing props apart.
    fn footprint(self) -> f64 {
        match self {
            PropKind::Building => 3.0,
            PropKind::LampPost => 0.5,
            PropKind::Tree => 1.5,
        }
    }
}

/// A static prop and the collision proxies that stand in for it.
#[derive(Clone, Debug)]
pub struct Prop {
    pub kind: PropKind,
    pub base: DVec3,
    pub heading: f64,
    /// Indices into [`World::obstacles`].
    pub colliders: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct Npc {
    pub name: String,
    pub agent: AgentState,
    /// Whether the NPC is currently turned toward the player.
    pub attentive: bool,
}

pub struct World {
    pub manifold: SphereManifold,
    pub obstacles: ObstacleSet,
    pub props: Vec<Prop>,
    pub npcs: Vec<Npc>,
    notice_distance: f64,
}

impl World {
    /// Build a planet from config, keeping `spawn` clear of props and NPCs.
    ///
    /// The layout depends only on the config, so the same seed always gives
    /// the same planet.
    pub fn generate(
        config: &PlanetConfig,
        spawn_lat: f64,
        spawn_lon: f64,
    ) -> Result<Self, GameError> {
        let (cx, cy, cz) = config.center;
        let manifold = SphereManifold::new(config.radius, DVec3::new(cx, cy, cz))?;
        let spawn = manifold.lat_lon_to_position(spawn_lat, spawn_lon);

        let mut world = Self {
            manifold,
            obstacles: ObstacleSet::new(),
            props: Vec::with_capacity(config.prop_count as usize),
            npcs: Vec::with_capacity(config.npc_count as usize),
            notice_distance: config.npc_notice_distance,
        };

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        for i in 0..config.prop_count {
            let kind = PropKind::ALL[i as usize % PropKind::ALL.len()];
            let Some(base) = world.free_spot(&mut rng, spawn, kind.footprint()) else {
                debug!(?kind, "no free spot left for prop");
                continue;
            };
            let heading = rng.random::<f64>() * std::f64::consts::TAU;
            world.place_prop(kind, base, heading);
        }

        for i in 0..config.npc_count {
            let Some(position) = world.free_spot(&mut rng, spawn, 1.0) else {
                debug!(npc = i, "no free spot left for npc");
                continue;
            };
            let heading = rng.random::<f64>() * std::f64::consts::TAU;
            world.place_npc(format!("resident-{i}"), position, heading);
        }

        info!(
            radius = config.radius,
            props = world.props.len(),
            npcs = world.npcs.len(),
            colliders = world.obstacles.len(),
            "planet generated"
        );
        Ok(world)
    }

    /// An empty planet with no props or NPCs.
    pub fn bare(manifold: SphereManifold) -> Self {
        Self {
            manifold,
            obstacles: ObstacleSet::new(),
            props: Vec::new(),
            npcs: Vec::new(),
            notice_distance: 0.0,
        }
    }

    /// Stand a prop on the surface at `base`, oriented with `heading`.
    pub fn place_prop(&mut self, kind: PropKind, base: DVec3, heading: f64) -> usize {
        let base = self.manifold.project_to_surface(base);
        let up = self.manifold.up_vector(base);
        let rotation = self.manifold.surface_orientation(base, heading);

        let colliders = match kind {
            PropKind::Building => {
                let half = DVec3::new(2.5, 3.0, 2.0);
                vec![self.obstacles.push(ObstacleShape::oriented_box(
                    base + up * half.y,
                    half,
                    rotation,
                ))]
            }
            PropKind::LampPost => vec![
                self.obstacles
                    .push(ObstacleShape::standing_capsule(base, up, 4.0, 0.15)),
            ],
            PropKind::Tree => vec![
                self.obstacles
                    .push(ObstacleShape::standing_capsule(base, up, 2.5, 0.3)),
                self.obstacles
                    .push(ObstacleShape::sphere(base + up * 3.0, 1.4)),
            ],
        };

        self.props.push(Prop {
            kind,
            base,
            heading,
            colliders,
        });
        self.props.len() - 1
    }

    /// Add an NPC standing at `position` with a body collider.
    pub fn place_npc(&mut self, name: String, position: DVec3, heading: f64) -> usize {
        let position = self.manifold.project_to_surface(position);
        let up = self.manifold.up_vector(position);
        self.obstacles
            .push(ObstacleShape::standing_capsule(position, up, 1.8, 0.4));
        self.npcs.push(Npc {
            name,
            agent: AgentState::new(position, heading),
            attentive: false,
        });
        self.npcs.len() - 1
    }

    pub fn set_notice_distance(&mut self, distance: f64) {
        self.notice_distance = distance;
    }

    /// Turn NPCs near the player toward them. Returns how many are watching.
    pub fn update_npcs(&mut self, player: DVec3) -> usize {
        let manifold = self.manifold;
        let notice = self.notice_distance;
        let mut watching = 0;
        for npc in &mut self.npcs {
            let near = manifold.arc_distance(npc.agent.position, player) <= notice;
            if near && npc.agent.face_towards(&manifold, player) {
                watching += 1;
                if !npc.attentive {
                    debug!(npc = %npc.name, "noticed the player");
                }
                npc.attentive = true;
            } else {
                npc.attentive = false;
            }
        }
        watching
    }

    fn free_spot(&self, rng: &mut ChaCha8Rng, spawn: DVec3, footprint: f64) -> Option<DVec3> {
        (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
            let lat = (1.0 - 2.0 * rng.random::<f64>()).asin().to_degrees();
            let lon = rng.random_range(-180.0..180.0);
            let candidate = self.manifold.lat_lon_to_position(lat, lon);
            self.is_clear(candidate, spawn, footprint).then_some(candidate)
        })
    }

    fn is_clear(&self, candidate: DVec3, spawn: DVec3, footprint: f64) -> bool {
        let m = &self.manifold;
        if m.arc_distance(candidate, spawn) < SPAWN_CLEARANCE + footprint {
            return false;
        }
        let clear_of_props = self
            .props
            .iter()
            .all(|p| m.arc_distance(candidate, p.base) >= p.kind.footprint() + footprint);
        let clear_of_npcs = self
            .npcs
            .iter()
            .all(|n| m.arc_distance(candidate, n.agent.position) >= 1.0 + footprint);
        clear_of_props && clear_of_npcs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlanetConfig {
        PlanetConfig::default()
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = World::generate(&config(), 0.0, 0.0).unwrap();
        let b = World::generate(&config(), 0.0, 0.0).unwrap();
        assert_eq!(a.props.len(), b.props.len());
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        for (pa, pb) in a.props.iter().zip(&b.props) {
            assert_eq!(pa.base, pb.base);
            assert_eq!(pa.kind, pb.kind);
        }
    }

    #[test]
    fn test_spawn_is_clear() {
        let world = World::generate(&config(), 10.0, 20.0).unwrap();
        let spawn = world.manifold.lat_lon_to_position(10.0, 20.0);
        for prop in &world.props {
            assert!(world.manifold.arc_distance(spawn, prop.base) >= SPAWN_CLEARANCE);
        }
        for npc in &world.npcs {
            assert!(world.manifold.arc_distance(spawn, npc.agent.position) >= SPAWN_CLEARANCE);
        }
    }

    #[test]
    fn test_props_stand_on_surface() {
        let world = World::generate(&config(), 0.0, 0.0).unwrap();
        assert!(!world.props.is_empty());
        for prop in &world.props {
            assert!((prop.base.length() - world.manifold.radius()).abs() < 1e-9);
            assert!(!prop.colliders.is_empty());
        }
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let bad = PlanetConfig {
            radius: -3.0,
            ..config()
        };
        assert!(matches!(
            World::generate(&bad, 0.0, 0.0),
            Err(GameError::Planet(_))
        ));
    }

    #[test]
    fn test_building_box_stands_upright() {
        let manifold = SphereManifold::at_origin(50.0).unwrap();
        let mut world = World::bare(manifold);
        let base = manifold.lat_lon_to_position(30.0, -45.0);
        world.place_prop(PropKind::Building, base, 0.4);
        let up = manifold.up_vector(base);
        let box_shape = world.obstacles.get(0).unwrap();
        assert!(box_shape.contains(base + up * 5.9, 0.0));
        assert!(!box_shape.contains(base + up * 6.1, 0.0));
        assert!(!box_shape.contains(base - up * 0.1, 0.0));
    }

    #[test]
    fn test_npc_faces_player_when_near() {
        let manifold = SphereManifold::at_origin(50.0).unwrap();
        let mut world = World::bare(manifold);
        world.set_notice_distance(6.0);
        let npc_pos = manifold.lat_lon_to_position(0.0, 0.0);
        world.place_npc("a".into(), npc_pos, 0.0);

        let far = manifold.lat_lon_to_position(0.0, 30.0);
        assert_eq!(world.update_npcs(far), 0);
        assert_eq!(world.npcs[0].agent.heading, 0.0);

        let near = manifold.lat_lon_to_position(0.0, 5.0);
        assert_eq!(world.update_npcs(near), 1);
        assert!(world.npcs[0].attentive);
        let facing = world.npcs[0].agent.forward(&manifold);
        let expected = manifold.heading_towards(npc_pos, near).unwrap();
        assert!((world.npcs[0].agent.heading - expected).abs() < 1e-12);
        assert!(facing.dot(near - npc_pos) > 0.0);
    }

    #[test]
    fn test_npc_has_collider() {
        let manifold = SphereManifold::at_origin(50.0).unwrap();
        let mut world = World::bare(manifold);
        let p = manifold.lat_lon_to_position(0.0, 0.0);
        world.place_npc("b".into(), p, 0.0);
        assert_eq!(world.obstacles.len(), 1);
        let up = manifold.up_vector(p);
        assert!(world.obstacles.get(0).unwrap().contains(p + up, 0.0));
    }
}
