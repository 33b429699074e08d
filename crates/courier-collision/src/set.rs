use crate::{ObstacleShape, Ray, RayCaster, RayHit};

/// Flat list of world collision proxies answering closest-hit queries.
///
/// Built once by the world collaborator; the controller and camera only read
/// it.
#[derive(Clone, Debug, Default)]
pub struct ObstacleSet {
    shapes: Vec<ObstacleShape>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a proxy and return its index.
    pub fn push(&mut self, shape: ObstacleShape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ObstacleShape> {
        self.shapes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObstacleShape> {
        self.shapes.iter()
    }
}

impl FromIterator<ObstacleShape> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = ObstacleShape>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
        }
    }
}

impl RayCaster for ObstacleSet {
    fn cast_ray(&self, ray: &Ray, max_distance: f64, radius: f64) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        for (index, shape) in self.shapes.iter().enumerate() {
            let Some((distance, normal)) = shape.intersect(ray, radius) else {
                continue;
            };
            if distance > max_distance {
                continue;
            }
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(RayHit {
                    distance,
                    point: ray.at(distance),
                    normal,
                    obstacle: index,
                });
            }
        }
        best
    }
}
