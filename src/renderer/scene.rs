//! Frame driver: environment first, then sprites far-to-near.

use glam::Vec2;
use hecs::World;
use smallvec::SmallVec;
use tracing::trace;

use crate::{
    renderer::{PixelSink, Renderer, RendererExt, SpriteCoverage},
    sim::{Position, SpriteRef},
    world::{Pose, RayCastMap, TextureBank, TextureSource},
};

struct QueuedSprite<'a> {
    pos: Vec2,
    tex: &'a dyn TextureSource,
}

/// Sprites waiting for the end of the frame.
///
/// The depth buffer is only written once per column per sprite, so the
/// queue draws in far-to-near camera depth order whatever the push order.
#[derive(Default)]
pub struct SpriteQueue<'a> {
    items: SmallVec<[QueuedSprite<'a>; 16]>,
}

impl<'a> SpriteQueue<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<T: TextureSource>(&mut self, pos: Vec2, tex: &'a T) {
        self.items.push(QueuedSprite { pos, tex });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Draw and drain every queued sprite. Returns how many were at least
    /// partly visible.
    pub fn flush<R, S>(&mut self, renderer: &mut R, sink: &mut S, pose: &Pose) -> usize
    where
        R: Renderer + ?Sized,
        S: PixelSink + ?Sized,
    {
        // far-to-near painter’s order
        self.items
            .sort_by(|a, b| pose.to_cam(b.pos).y.total_cmp(&pose.to_cam(a.pos).y));

        let mut visible = 0;
        for spr in self.items.drain(..) {
            match renderer.draw_sprite(sink, spr.tex, spr.pos, pose) {
                SpriteCoverage::Drawn { .. } => visible += 1,
                other => trace!(x = spr.pos.x, y = spr.pos.y, ?other, "sprite skipped"),
            }
        }
        visible
    }
}

/// Render one frame of `map` plus every `(Position, SpriteRef)` entity in
/// `world`. Unknown texture ids draw the bank's fallback texture.
pub fn draw_scene<R, M, S>(
    renderer: &mut R,
    sink: &mut S,
    map: &M,
    pose: &Pose,
    world: &World,
    bank: &TextureBank,
) -> usize
where
    R: Renderer + ?Sized,
    M: RayCastMap + ?Sized,
    S: PixelSink + ?Sized,
{
    let mut queue = SpriteQueue::new();
    for (_, (pos, spr)) in world.query::<(&Position, &SpriteRef)>().iter() {
        queue.push(pos.0, bank.texture_or_missing(spr.0));
    }
    let queued = queue.len();

    renderer.begin_frame(sink.width(), sink.height());
    renderer.draw_environment(sink, map, pose);
    let visible = queue.flush(renderer, sink, pose);

    trace!(queued, visible, "scene drawn");
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::{FrameBuffer, Software},
        sim::spawn_prop,
        world::{GridMap, Rgb, Texture},
    };
    use glam::vec2;
    use pretty_assertions::assert_eq;

    /// Records sprite depths in draw order instead of painting.
    #[derive(Default)]
    struct Recorder {
        began: usize,
        environments: usize,
        sprites: Vec<f32>,
    }

    impl Renderer for Recorder {
        fn begin_frame(&mut self, _: usize, _: usize) {
            self.began += 1;
        }

        fn draw_environment<M, S>(&mut self, _: &mut S, _: &M, _: &Pose)
        where
            M: RayCastMap + ?Sized,
            S: PixelSink + ?Sized,
        {
            self.environments += 1;
        }

        fn draw_sprite<T, S>(&mut self, _: &mut S, _: &T, pos: Vec2, pose: &Pose) -> SpriteCoverage
        where
            T: TextureSource + ?Sized,
            S: PixelSink + ?Sized,
        {
            self.sprites.push(pose.to_cam(pos).y);
            SpriteCoverage::Drawn { columns: 1 }
        }
    }

    #[test]
    fn queue_draws_far_to_near() {
        let tex = Texture::default();
        let pose = Pose::new(vec2(0.0, 0.0), 0.0);
        let mut queue = SpriteQueue::new();
        for d in [3.0, 9.0, 1.0, 5.0] {
            queue.push(vec2(0.2, d), &tex);
        }
        let mut rec = Recorder::default();
        let mut fb = FrameBuffer::new(4, 4).unwrap();

        assert_eq!(queue.flush(&mut rec, &mut fb, &pose), 4);
        assert_eq!(rec.sprites, vec![9.0, 5.0, 3.0, 1.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn draw_frame_runs_the_whole_sequence() {
        let tex = Texture::default();
        let mut queue = SpriteQueue::new();
        queue.push(vec2(0.0, 2.0), &tex);

        let mut rec = Recorder::default();
        let mut fb = FrameBuffer::new(4, 4).unwrap();
        rec.draw_frame(&mut fb, &GridMap::walled(3, 3), &Pose::new(Vec2::ZERO, 0.0), &mut queue);

        assert_eq!((rec.began, rec.environments, rec.sprites.len()), (1, 1, 1));
    }

    #[test]
    fn scene_draws_world_props() {
        let map: GridMap = "\
#######
#.....#
#.....#
#.....#
#.....#
#.....#
#######"
            .parse()
            .unwrap();

        let mut bank = TextureBank::default_with_checker();
        let green = bank
            .insert("GREEN", Texture::solid("GREEN", Rgb::new(0, 255, 0)))
            .unwrap();

        let mut world = World::new();
        // straight ahead of the camera, well inside the room
        spawn_prop(&mut world, vec2(3.5, 3.5), green);
        // behind the camera
        spawn_prop(&mut world, vec2(3.5, 1.2), green);

        let pose = Pose::new(vec2(3.5, 1.5), 0.0);
        let mut fb = FrameBuffer::new(64, 40).unwrap();
        let mut sw = Software::default();

        let visible = draw_scene(&mut sw, &mut fb, &map, &pose, &world, &bank);
        assert_eq!(visible, 1);
        // wall at y = 6 is 4.5 away; the prop is 2 away
        assert_eq!(sw.depth()[32], 2.0);
        // green at depth 2 → 127
        assert_eq!(fb.pixel(32, 20), Rgb::new(0, 127, 0));
    }
}
