//! GPU-accelerated projectile runner using WGPU.
//!
//! This module runs the projectile kernel on the GPU using WGPU + WGSL. It
//! handles GPU context initialization, shader compilation (once, via
//! `lazy_static`), and compute dispatch with one invocation per projectile.
//!
//! WGSL has no `f64`, so the kernel evaluates every step in `f32`. Results
//! agree with the CPU paths to within
//! [`Comparison::GPU`](crate::verify::Comparison::GPU) but are not bit-identical.

use std::sync::mpsc;

use wgpu::util::DeviceExt;

use crate::BATCH_SIZE;
use crate::backend::Backend;
use crate::error::{Error, Result, check_len};
use crate::physics::{HeightFormula, RangeCalculator};
use crate::projectile::Projectile;

const PROJECTILE: &str = include_str!("shaders/projectile.wgsl");
const WORKGROUP_SIZE: u32 = 64;

/// Low-level failures raised while talking to the GPU.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    /// No adapter matched the request.
    #[error("adapter error: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    /// The adapter refused to open a device.
    #[error("device error: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    /// Mapping the staging buffer failed.
    #[error("buffer map error: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    /// Waiting on the device failed (e.g. device lost).
    #[error("device poll error: {0}")]
    Poll(#[from] wgpu::PollError),
    /// A validation error scope caught a problem.
    #[error("validation error: {0}")]
    Validation(String),
    /// Results could not be read back.
    #[error("readback error: {0}")]
    Readback(&'static str),
}

/// Holds the WGPU device, queue and the compiled projectile pipeline.
///
/// Initialized once globally and reused for every run via `lazy_static`.
pub struct GpuContext {
    /// The actual GPU device.
    pub device: wgpu::Device,
    /// A queue for information related to the device.
    pub queue: wgpu::Queue,
    /// Name and API of the selected adapter.
    pub adapter_info: wgpu::AdapterInfo,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::ComputePipeline,
}

impl GpuContext {
    /// Selects the default adapter, opens a device and compiles the kernel.
    ///
    /// # Internals
    /// - Uses `pollster::block_on` to synchronously wait for async WGPU calls
    /// - Shader and pipeline creation run inside a validation error scope
    ///
    /// # Errors
    /// Any [`GpuError`] raised while acquiring the adapter or device, or
    /// while validating the shader.
    pub fn new() -> std::result::Result<Self, GpuError> {
        let instance = wgpu::Instance::default();
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))?;
        let adapter_info = adapter.get_info();

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("projectile_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::default(),
        }))?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("projectile"),
            source: wgpu::ShaderSource::Wgsl(PROJECTILE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("projectile_bgl"),
            entries: &[
                layout_entry(0, wgpu::BufferBindingType::Uniform),
                layout_entry(1, wgpu::BufferBindingType::Storage { read_only: true }),
                layout_entry(2, wgpu::BufferBindingType::Storage { read_only: false }),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("projectile_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("projectile_pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            cache: None,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(GpuError::Validation(err.to_string()));
        }

        log::info!(
            "Target device: {} ({:?})",
            adapter_info.name,
            adapter_info.backend
        );

        Ok(Self {
            device,
            queue,
            adapter_info,
            bind_group_layout,
            pipeline,
        })
    }
}

fn layout_entry(binding: u32, ty: wgpu::BufferBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

lazy_static::lazy_static! {
    static ref GPU_CONTEXT: std::result::Result<GpuContext, String> =
        GpuContext::new().map_err(|e| e.to_string());
}

/// Returns the process-wide GPU context, initializing it on first use.
///
/// # Errors
/// [`Error::DeviceUnavailable`] if initialization failed; the failure is
/// cached and reported again on every call.
pub fn context() -> Result<&'static GpuContext> {
    GPU_CONTEXT.as_ref().map_err(|reason| Error::DeviceUnavailable {
        backend: Backend::Wgpu,
        reason: reason.clone(),
    })
}

/// Computes every projectile of the batch on the GPU.
///
/// # Errors
/// - [`Error::SizeMismatch`] unless `inputs.len() == BATCH_SIZE`
/// - [`Error::DeviceUnavailable`] if no GPU context can be acquired
/// - [`Error::ExecutionFailure`] covering the whole batch if the dispatch or
///   readback fails
pub fn run_parallel(calc: &RangeCalculator, inputs: &[Projectile]) -> Result<Vec<Projectile>> {
    check_len(BATCH_SIZE, inputs.len())?;
    let ctx = context()?;

    let out = run_kernel(ctx, calc.height_formula, inputs).map_err(|e| {
        log::error!("gpu dispatch failed: {e}");
        Error::ExecutionFailure {
            failed: (0..inputs.len()).collect(),
            reason: e.to_string(),
        }
    })?;

    log::debug!(
        "wgpu run computed {} projectiles on {}",
        out.len(),
        ctx.adapter_info.name
    );
    Ok(out)
}

fn height_formula_tag(formula: HeightFormula) -> u32 {
    match formula {
        HeightFormula::Literal => 0,
        HeightFormula::Corrected => 1,
    }
}

fn as_bytes<T: Copy>(data: &[T]) -> &[u8] {
    let len = std::mem::size_of_val(data);
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, len) }
}

fn bytes_to_f32_slice(data: &[u8]) -> std::result::Result<&[f32], &'static str> {
    use std::mem::{align_of, size_of};

    if data.as_ptr() as usize % align_of::<f32>() != 0 {
        return Err("unaligned buffer");
    }

    if data.len() % size_of::<f32>() != 0 {
        return Err("buffer length is not a multiple of f32");
    }

    let len = data.len() / size_of::<f32>();
    let ptr = data.as_ptr() as *const f32;
    unsafe { Ok(std::slice::from_raw_parts(ptr, len)) }
}

fn run_kernel(
    ctx: &GpuContext,
    formula: HeightFormula,
    inputs: &[Projectile],
) -> std::result::Result<Vec<Projectile>, GpuError> {
    let device = &ctx.device;

    let lanes: Vec<f32> = inputs.iter().flat_map(|p| p.to_lanes()).collect();
    let size = std::mem::size_of_val(lanes.as_slice()) as u64;
    let params = [height_formula_tag(formula), 0, 0, 0];

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let params_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("projectile_params"),
        contents: as_bytes(&params),
        usage: wgpu::BufferUsages::UNIFORM,
    });

    let input_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("projectile_inputs"),
        contents: as_bytes(&lanes),
        usage: wgpu::BufferUsages::STORAGE,
    });

    let output_buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("projectile_outputs"),
        size,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    });

    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("projectile_staging"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("projectile_bind_group"),
        layout: &ctx.bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: input_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: output_buf.as_entire_binding(),
            },
        ],
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("projectile_encoder"),
    });

    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("projectile_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&ctx.pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups((inputs.len() as u32).div_ceil(WORKGROUP_SIZE), 1, 1);
    }

    encoder.copy_buffer_to_buffer(&output_buf, 0, &staging, 0, size);
    ctx.queue.submit(Some(encoder.finish()));

    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(GpuError::Validation(err.to_string()));
    }

    let (tx, rx) = mpsc::channel();
    staging.slice(..).map_async(wgpu::MapMode::Read, move |res| {
        let _ = tx.send(res);
    });
    device.poll(wgpu::PollType::Wait)?;
    rx.recv()
        .map_err(|_| GpuError::Readback("map callback never ran"))??;

    let data = staging.slice(..).get_mapped_range();
    let out = bytes_to_f32_slice(&data)
        .map_err(GpuError::Readback)?
        .chunks_exact(Projectile::LANES)
        .map(|c| Projectile::from_lanes([c[0], c[1], c[2], c[3], c[4]]))
        .collect();
    drop(data);
    staging.unmap();

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::scalar::run_scalar;
    use crate::verify::{Comparison, verify};

    fn sweep() -> Vec<Projectile> {
        (0..BATCH_SIZE)
            .map(|i| Projectile::new(10.0 + (i % 90) as f32, 10.0 + 4.0 * i as f32))
            .collect()
    }

    #[test]
    fn gpu_matches_scalar_within_tolerance() {
        if let Err(e) = context() {
            eprintln!("skipping: {e}");
            return;
        }

        for formula in [HeightFormula::Literal, HeightFormula::Corrected] {
            let calc = RangeCalculator::new(formula);
            let inputs = sweep();
            let gpu = run_parallel(&calc, &inputs).unwrap();
            let cpu = run_scalar(&calc, &inputs).unwrap();
            assert_eq!(verify(&gpu, &cpu, Comparison::GPU), Ok(()));
        }
    }

    #[test]
    fn gpu_rejects_wrong_batch_size() {
        let calc = RangeCalculator::default();
        assert_eq!(
            run_parallel(&calc, &sweep()[..10]),
            Err(Error::SizeMismatch {
                expected: BATCH_SIZE,
                found: 10
            })
        );
    }
}
