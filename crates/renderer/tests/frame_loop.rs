use renderer::gpu::build_program;
use renderer::pattern::{shade, TIME_UNIFORM};
use renderer::{
    create_program, create_shader, AnimationDriver, FrameError, FrameScheduler, FrameStatus,
    FrameTarget, ShaderError, ShaderKind, UniformSlot,
};

/// Stands in for the GPU: keeps the last time uniform and rasterises a few
/// probe points through the host mirror of the fragment stage.
struct ProbeTarget {
    time: f32,
    probes: Vec<[f32; 2]>,
    frames: Vec<Vec<[f32; 4]>>,
}

impl ProbeTarget {
    fn new(probes: Vec<[f32; 2]>) -> Self {
        Self {
            time: 0.0,
            probes,
            frames: Vec::new(),
        }
    }
}

impl FrameTarget for ProbeTarget {
    fn write_time(&mut self, _slot: UniformSlot, seconds: f32) {
        self.time = seconds;
    }

    fn draw_quad(&mut self) -> Result<FrameStatus, FrameError> {
        let time = self.time;
        let colors = self.probes.iter().map(|&probe| shade(time, probe)).collect();
        self.frames.push(colors);
        Ok(FrameStatus::Presented)
    }
}

#[derive(Default)]
struct Scheduler {
    armed: usize,
}

impl FrameScheduler for Scheduler {
    fn request_frame(&mut self) -> Result<(), FrameError> {
        self.armed += 1;
        Ok(())
    }
}

#[test]
fn first_frame_matches_time_zero_scenario() {
    let program = build_program().expect("fixed shaders build");
    let slot = program.uniform_slot(TIME_UNIFORM);
    assert!(slot.is_some());

    let target = ProbeTarget::new(vec![[0.6, 0.0], [0.3, 0.0], [0.499, 0.0]]);
    let mut driver = AnimationDriver::new(target, slot);
    let mut scheduler = Scheduler::default();

    driver.render(0.0, &mut scheduler).expect("frame");

    let frame = &driver.target().frames[0];
    assert_eq!(frame[0], [0.0, 0.0, 0.0, 1.0]);
    assert!((frame[1][0] - 0.5).abs() < 1e-6);
    assert_eq!(frame[1][1..], [0.0_f32, 0.0, 1.0]);
    assert_eq!(frame[2], [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(scheduler.armed, 1);
}

#[test]
fn later_frames_move_the_ring() {
    let program = build_program().expect("fixed shaders build");
    let target = ProbeTarget::new(vec![[0.9, 0.0]]);
    let mut driver = AnimationDriver::new(target, program.uniform_slot(TIME_UNIFORM));
    let mut scheduler = Scheduler::default();

    // t = 0: radius 0.5, the probe is outside. t ≈ π/2: radius ≈ 1, inside.
    driver.render(0.0, &mut scheduler).expect("frame");
    driver.render(1570.0, &mut scheduler).expect("frame");

    let frames = &driver.target().frames;
    assert_eq!(frames[0][0], [0.0, 0.0, 0.0, 1.0]);
    assert!(frames[1][0][0] > 0.0, "{:?}", frames[1][0]);
    assert_eq!(scheduler.armed, 2);
}

#[test]
fn broken_stage_never_reaches_the_driver() {
    let vertex = create_shader(ShaderKind::Vertex, renderer::pattern::VERTEX_SHADER_GLSL);
    let fragment = create_shader(ShaderKind::Fragment, "#version 450\nvoid main() {");
    assert!(vertex.is_ok());

    let linked: Result<_, ShaderError> = fragment.and_then(|fragment| create_program(vertex?, fragment));
    let err = linked.expect_err("compile failure propagates");
    assert!(matches!(err, ShaderError::Compile { stage: ShaderKind::Fragment, .. }));
}
