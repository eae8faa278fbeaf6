use egui::Vec2;

use crate::{consts::MIN_GRID_CELL_SIZE, particle::Particle};

/// Uniform bucket grid over the field holding enzyme indices.
///
/// Distances are plain euclidean (the reaction check does not wrap
/// around the field), so queries never wrap either.
#[derive(Debug, Clone)]
pub struct EnzymeGrid {
    cell_size: f32,
    columns: usize,
    rows: usize,
    buckets: Vec<Vec<usize>>,
}

impl EnzymeGrid {
    pub fn new(field: Vec2, reaction_radius: f32) -> Self {
        let cell_size = reaction_radius.max(MIN_GRID_CELL_SIZE);
        let columns = ((field.x / cell_size).ceil() as usize).max(1);
        let rows = ((field.y / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            columns,
            rows,
            buckets: vec![Vec::new(); columns * rows],
        }
    }

    pub fn rebuild(&mut self, enzymes: &[Particle]) {
        self.buckets.iter_mut().for_each(Vec::clear);
        for (i, enzyme) in enzymes.iter().enumerate() {
            let column = self.cell_coord(enzyme.position.x, self.columns);
            let row = self.cell_coord(enzyme.position.y, self.rows);
            self.buckets[column + row * self.columns].push(i);
        }
    }

    /// Fills `out` with the indices of every enzyme that may lie within
    /// `radius` of `center`, in ascending order.
    pub fn candidates(&self, center: Vec2, radius: f32, out: &mut Vec<usize>) {
        out.clear();
        let (c0, c1) = (
            self.cell_coord(center.x - radius, self.columns),
            self.cell_coord(center.x + radius, self.columns),
        );
        let (r0, r1) = (
            self.cell_coord(center.y - radius, self.rows),
            self.cell_coord(center.y + radius, self.rows),
        );
        for row in r0..=r1 {
            for column in c0..=c1 {
                out.extend_from_slice(&self.buckets[column + row * self.columns]);
            }
        }
        out.sort_unstable();
    }

    fn cell_coord(&self, value: f32, count: usize) -> usize {
        if value <= 0. {
            0
        } else {
            ((value / self.cell_size) as usize).min(count - 1)
        }
    }
}

#[cfg(test)]
mod test {
    use egui::Vec2;

    use crate::particle::{Particle, Species};

    use super::EnzymeGrid;

    fn enzyme_at(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, 10., Species::Enzyme, [0, 0, 255])
    }

    #[test]
    fn grid_finds_nearby_enzymes_in_index_order() {
        let enzymes = vec![
            enzyme_at(105., 100.),
            enzyme_at(900., 700.),
            enzyme_at(95., 98.),
            enzyme_at(1199., 799.),
        ];
        let mut grid = EnzymeGrid::new(Vec2::new(1200., 800.), 10.);
        grid.rebuild(&enzymes);

        let mut out = Vec::new();
        grid.candidates(Vec2::new(100., 100.), 10., &mut out);
        assert_eq!(out, vec![0, 2]);

        grid.candidates(Vec2::new(1195., 795.), 10., &mut out);
        assert_eq!(out, vec![3]);
    }

    #[test]
    fn large_radius_covers_whole_field() {
        let enzymes: Vec<Particle> = (0..20)
            .map(|i| enzyme_at(i as f32 * 59., i as f32 * 39.))
            .collect();
        let mut grid = EnzymeGrid::new(Vec2::new(1200., 800.), 1000.);
        grid.rebuild(&enzymes);

        let mut out = Vec::new();
        grid.candidates(Vec2::new(600., 400.), 1000., &mut out);
        assert_eq!(out, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn zero_radius_still_builds_a_grid() {
        let mut grid = EnzymeGrid::new(Vec2::new(1200., 800.), 0.);
        grid.rebuild(&[enzyme_at(4., 4.)]);

        let mut out = Vec::new();
        grid.candidates(Vec2::new(4., 4.), 0., &mut out);
        assert_eq!(out, vec![0]);
    }
}
