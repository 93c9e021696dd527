//! Integration tests for GpuContext using a recording executor.
//!
//! The mock captures every request together with its completion handle so
//! a test decides when (and from which thread) an operation finishes.

use std::cell::RefCell;
use std::rc::Rc;

use gpu_mmio::gpu_registers::{PixelFormat, RegisterError};
use gpu_mmio::{
    ActiveFramebuffer, CommandListRequest, Completion, Dimensions, DisplayTransferRequest,
    FillModePolicy, FillPattern, FlipAxis, GpuConfig, GpuContext, GpuExecutor, MemoryFillRequest,
    MmioError, Operation, RegionState, ScalingInterpretation, TransferKind,
};

const FILL0_START: u32 = 0x004 * 4;
const FILL0_END: u32 = 0x005 * 4;
const FILL0_VALUE: u32 = 0x006 * 4;
const FILL0_CONTROL: u32 = 0x007 * 4;
const FILL1_CONTROL: u32 = 0x00B * 4;

const FB0: u32 = 0x117 * 4;
const FB0_ADDRESS_LEFT1: u32 = FB0 + 0x3 * 4;
const FB0_ADDRESS_LEFT2: u32 = FB0 + 0x4 * 4;
const FB0_ACTIVE_FB: u32 = FB0 + 0x7 * 4;
const FB0_STRIDE: u32 = FB0 + 0xD * 4;
const FB0_ADDRESS_RIGHT1: u32 = FB0 + 0xE * 4;
const FB0_ADDRESS_RIGHT2: u32 = FB0 + 0xF * 4;

const DT: u32 = 0x300 * 4;
const DT_INPUT_ADDRESS: u32 = DT;
const DT_OUTPUT_ADDRESS: u32 = DT + 4;
const DT_OUTPUT_SIZE: u32 = DT + 2 * 4;
const DT_INPUT_SIZE: u32 = DT + 3 * 4;
const DT_FLAGS: u32 = DT + 4 * 4;
const DT_TRIGGER: u32 = DT + 6 * 4;
const DT_TOTAL_BYTES: u32 = DT + 8 * 4;
const DT_INPUT_LINE: u32 = DT + 9 * 4;
const DT_OUTPUT_LINE: u32 = DT + 10 * 4;

const CP: u32 = 0x638 * 4;
const CP_SIZE: u32 = CP;
const CP_ADDRESS: u32 = CP + 2 * 4;
const CP_TRIGGER: u32 = CP + 4 * 4;

/// Captured executor call.
#[derive(Debug)]
enum Call {
    Fill(MemoryFillRequest),
    Transfer(DisplayTransferRequest),
    CommandList(CommandListRequest),
    Swap(usize, ActiveFramebuffer),
}

/// Mock executor that records calls and holds completions until asked.
#[derive(Clone, Default)]
struct MockExecutor {
    calls: Rc<RefCell<Vec<Call>>>,
    pending: Rc<RefCell<Vec<Completion>>>,
}

impl MockExecutor {
    fn calls(&self) -> std::cell::Ref<'_, Vec<Call>> {
        self.calls.borrow()
    }

    fn take_completion(&self) -> Completion {
        self.pending
            .borrow_mut()
            .pop()
            .expect("an operation should be pending")
    }

    fn complete_all(&self) {
        for completion in self.pending.borrow_mut().drain(..) {
            completion.complete();
        }
    }

    fn last_fill(&self) -> MemoryFillRequest {
        match self.calls().last() {
            Some(Call::Fill(request)) => *request,
            other => panic!("expected a fill, got {other:?}"),
        }
    }

    fn last_transfer(&self) -> DisplayTransferRequest {
        match self.calls().last() {
            Some(Call::Transfer(request)) => *request,
            other => panic!("expected a transfer, got {other:?}"),
        }
    }
}

impl GpuExecutor for MockExecutor {
    fn memory_fill(&mut self, request: MemoryFillRequest, completion: Completion) {
        self.calls.borrow_mut().push(Call::Fill(request));
        self.pending.borrow_mut().push(completion);
    }

    fn display_transfer(&mut self, request: DisplayTransferRequest, completion: Completion) {
        self.calls.borrow_mut().push(Call::Transfer(request));
        self.pending.borrow_mut().push(completion);
    }

    fn process_command_list(&mut self, request: CommandListRequest, completion: Completion) {
        self.calls.borrow_mut().push(Call::CommandList(request));
        self.pending.borrow_mut().push(completion);
    }

    fn framebuffer_swapped(&mut self, unit: usize, active: ActiveFramebuffer) {
        self.calls.borrow_mut().push(Call::Swap(unit, active));
    }
}

fn make_context(config: GpuConfig) -> (GpuContext<MockExecutor>, MockExecutor) {
    let _ = env_logger::builder().is_test(true).try_init();
    let executor = MockExecutor::default();
    let handle = executor.clone();
    (GpuContext::new(config, executor), handle)
}

const FILL: Operation = Operation::MemoryFill { unit: 0 };

// ============================================================================
// Plain storage
// ============================================================================

mod storage_tests {
    use super::*;

    #[test]
    fn write_then_read_every_plain_word() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        for index in (0..4096u32).step_by(7) {
            let value = index.wrapping_mul(0x9E37_79B9);
            if [0x007, 0x00B, 0x11E, 0x15E, 0x306, 0x63C].contains(&index) {
                continue;
            }
            gpu.write32(index * 4, value).unwrap();
            assert_eq!(gpu.read32(index * 4), Ok(value), "word {index:#x}");
        }
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn out_of_range_access() {
        let (mut gpu, _mock) = make_context(GpuConfig::default());
        let err = MmioError::Register(RegisterError::OutOfRange {
            index: 4096,
            len: 4096,
        });
        assert_eq!(gpu.read32(0x4000), Err(err));
        assert_eq!(gpu.write8(0x4003, 1), Err(err));
        assert_eq!(gpu.read8(0x3FFF), Ok(0));
    }

    #[test]
    fn sub_word_lanes() {
        let (mut gpu, _mock) = make_context(GpuConfig::default());
        gpu.write32(0x100, 0x4433_2211).unwrap();
        assert_eq!(gpu.read8(0x101), Ok(0x22));
        assert_eq!(gpu.read16(0x102), Ok(0x4433));

        gpu.write8(0x103, 0xAA).unwrap();
        gpu.write16(0x100, 0xBBCC).unwrap();
        assert_eq!(gpu.read32(0x100), Ok(0xAA33_BBCC));
        assert_eq!(gpu.read::<u32>(0x102), Ok(0xAA33_BBCC));
    }
}

// ============================================================================
// Memory fill
// ============================================================================

mod memory_fill_tests {
    use super::*;

    fn program_fill(gpu: &mut GpuContext<MockExecutor>) {
        gpu.write32(FILL0_START, 0x0030_0000).unwrap();
        gpu.write32(FILL0_END, 0x0030_4B00).unwrap();
        gpu.write32(FILL0_VALUE, 0x00CC_BBAA).unwrap();
    }

    #[test]
    fn trigger_lifecycle() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        program_fill(&mut gpu);

        gpu.write32(FILL0_CONTROL, 0x0000_0201).unwrap();
        assert_eq!(gpu.state(FILL), RegionState::Busy);
        assert_eq!(
            mock.last_fill(),
            MemoryFillRequest {
                unit: 0,
                start_address: 0x0180_0000,
                end_address: 0x0182_5800,
                pattern: FillPattern::Bits32(0x00CC_BBAA),
            }
        );
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0201));

        mock.complete_all();
        assert_eq!(gpu.state(FILL), RegionState::Idle);
        // finished=1 and trigger=0 land together
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0202));
    }

    #[test]
    fn retrigger_while_busy_is_rejected() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        program_fill(&mut gpu);
        gpu.write32(FILL0_CONTROL, 0x0000_0201).unwrap();

        assert_eq!(
            gpu.write32(FILL0_CONTROL, 0x0000_0101),
            Err(MmioError::OperationAlreadyInProgress(FILL))
        );
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0201));
        assert_eq!(mock.calls().len(), 1);

        // The running fill is unaffected.
        mock.complete_all();
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0202));
    }

    #[test]
    fn cpu_cannot_clear_trigger_while_busy() {
        let (mut gpu, _mock) = make_context(GpuConfig::default());
        program_fill(&mut gpu);
        gpu.write32(FILL0_CONTROL, 0x0000_0201).unwrap();

        gpu.write32(FILL0_CONTROL, 0x0000_0200).unwrap();
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0201));
        assert!(gpu.is_busy(FILL));

        // A byte write away from the trigger lane is plain storage.
        gpu.write8(FILL0_CONTROL + 1, 0x03).unwrap();
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0301));
    }

    #[test]
    fn finished_is_cleared_by_cpu_or_relaunch() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        program_fill(&mut gpu);
        gpu.write32(FILL0_CONTROL, 0x0000_0201).unwrap();
        mock.complete_all();

        // Writing 1 keeps finished, writing 0 clears it.
        gpu.write32(FILL0_CONTROL, 0x0000_0202).unwrap();
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0202));
        gpu.write32(FILL0_CONTROL, 0x0000_0200).unwrap();
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0200));

        // The CPU cannot set it.
        gpu.write32(FILL0_CONTROL, 0x0000_0202).unwrap();
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0200));

        gpu.write32(FILL0_CONTROL, 0x0000_0201).unwrap();
        mock.complete_all();
        gpu.write32(FILL0_CONTROL, 0x0000_0203).unwrap();
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0201));
    }

    #[test]
    fn invalid_fill_mode_is_reported() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        program_fill(&mut gpu);

        assert_eq!(
            gpu.write32(FILL0_CONTROL, 0x0000_0001),
            Err(MmioError::InvalidFillMode {
                fill_24bit: false,
                fill_32bit: false
            })
        );
        assert_eq!(
            gpu.write32(FILL0_CONTROL, 0x0000_0301),
            Err(MmioError::InvalidFillMode {
                fill_24bit: true,
                fill_32bit: true
            })
        );
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0));
        assert_eq!(gpu.state(FILL), RegionState::Idle);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn zero_selects_16bit_policy() {
        let config = GpuConfig {
            fill_mode_policy: FillModePolicy::ZeroSelects16Bit,
            ..GpuConfig::default()
        };
        let (mut gpu, mock) = make_context(config);
        program_fill(&mut gpu);

        gpu.write32(FILL0_CONTROL, 0x0000_0001).unwrap();
        assert_eq!(mock.last_fill().pattern, FillPattern::Bits16(0xBBAA));
        mock.complete_all();

        assert!(matches!(
            gpu.write32(FILL0_CONTROL, 0x0000_0301),
            Err(MmioError::InvalidFillMode { .. })
        ));
    }

    #[test]
    fn fill24_component_order() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        program_fill(&mut gpu);
        gpu.write32(FILL0_CONTROL, 0x0000_0101).unwrap();
        assert_eq!(mock.last_fill().pattern, FillPattern::Bits24([0xAA, 0xBB, 0xCC]));

        let config = GpuConfig {
            fill24_order: gpu_mmio::ComponentOrder::Bgr,
            ..GpuConfig::default()
        };
        let (mut gpu, mock) = make_context(config);
        program_fill(&mut gpu);
        gpu.write32(FILL0_CONTROL, 0x0000_0101).unwrap();
        assert_eq!(mock.last_fill().pattern, FillPattern::Bits24([0xCC, 0xBB, 0xAA]));
    }

    #[test]
    fn units_are_independent() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        program_fill(&mut gpu);
        gpu.write32(FILL0_CONTROL, 0x0000_0201).unwrap();
        gpu.write32(FILL1_CONTROL, 0x0000_0201).unwrap();

        assert!(gpu.is_busy(Operation::MemoryFill { unit: 0 }));
        assert!(gpu.is_busy(Operation::MemoryFill { unit: 1 }));

        let unit1 = mock.take_completion();
        assert_eq!(unit1.operation(), Operation::MemoryFill { unit: 1 });
        unit1.complete();
        assert!(gpu.is_busy(Operation::MemoryFill { unit: 0 }));
        assert_eq!(gpu.read32(FILL1_CONTROL), Ok(0x0000_0202));
    }

    #[test]
    fn completion_from_another_thread() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        program_fill(&mut gpu);
        gpu.write32(FILL0_CONTROL, 0x0000_0201).unwrap();

        let completion = mock.take_completion();
        std::thread::spawn(move || completion.complete())
            .join()
            .unwrap();

        assert_eq!(gpu.state(FILL), RegionState::Idle);
        assert_eq!(gpu.read32(FILL0_CONTROL), Ok(0x0000_0202));
    }
}

// ============================================================================
// Framebuffer swap
// ============================================================================

mod framebuffer_tests {
    use super::*;

    #[test]
    fn active_fb_selects_address_set() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        gpu.write32(FB0_ADDRESS_LEFT1, 0x0300_0000).unwrap();
        gpu.write32(FB0_ADDRESS_LEFT2, 0x0302_0000).unwrap();
        gpu.write32(FB0_ADDRESS_RIGHT1, 0x0304_0000).unwrap();
        gpu.write32(FB0_ADDRESS_RIGHT2, 0x0306_0000).unwrap();
        gpu.write32(FB0_STRIDE, 480).unwrap();

        gpu.write32(FB0_ACTIVE_FB, 1).unwrap();
        let fb = gpu.with_registers(|regs| {
            let fb = regs.framebuffer(0).unwrap();
            (fb.active_address_left(), fb.active_address_right())
        });
        assert_eq!(fb, (0x0302_0000, 0x0306_0000));

        gpu.write32(FB0_ACTIVE_FB, 0).unwrap();
        let fb = gpu.with_registers(|regs| regs.framebuffer(0).unwrap().active_address_left());
        assert_eq!(fb, 0x0300_0000);

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            Call::Swap(0, active) => {
                assert_eq!(active.set, 1);
                assert_eq!(active.left_address, 0x1810_0000);
                assert_eq!(active.right_address, 0x1830_0000);
                assert_eq!(active.stride, 480);
            }
            other => panic!("expected a swap, got {other:?}"),
        }
        assert!(matches!(&calls[1], Call::Swap(0, active) if active.set == 0));
    }

    #[test]
    fn swap_has_no_busy_state() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        gpu.write32(FB0_ACTIVE_FB, 1).unwrap();
        gpu.write32(FB0_ACTIVE_FB, 1).unwrap();
        assert_eq!(mock.calls().len(), 2);
        assert!(mock.pending.borrow().is_empty());
    }
}

// ============================================================================
// Display transfer
// ============================================================================

mod display_transfer_tests {
    use super::*;

    #[test]
    fn conversion_request() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        gpu.write32(DT_INPUT_ADDRESS, 0x0030_0000).unwrap();
        gpu.write32(DT_OUTPUT_ADDRESS, 0x0300_0000).unwrap();
        gpu.write32(DT_INPUT_SIZE, 0x0190_00F0).unwrap();
        gpu.write32(DT_OUTPUT_SIZE, 0x0190_00F0).unwrap();
        gpu.write32(DT_FLAGS, 0x0100_2001).unwrap();
        gpu.write32(DT_TRIGGER, 0x0000_0004).unwrap();

        assert!(gpu.is_busy(Operation::DisplayTransfer));
        let request = mock.last_transfer();
        assert_eq!(request.input_address, 0x0180_0000);
        assert_eq!(request.output_address, 0x1800_0000);
        assert!(request.flags.flip_data());
        assert_eq!(request.flip_axis, FlipAxis::Horizontal);
        let TransferKind::Convert(convert) = request.kind else {
            panic!("expected a format conversion");
        };
        assert_eq!(convert.input_format, PixelFormat::Rgba8);
        assert_eq!(convert.output_format, PixelFormat::Rgb565);
        let size = Dimensions {
            width: 240,
            height: 400,
        };
        assert_eq!(convert.input_size, size);
        assert_eq!(convert.output_size, size);
        assert_eq!(convert.scaled_output_size, size);

        mock.complete_all();
        assert_eq!(gpu.read32(DT_TRIGGER), Ok(0));
        assert!(!gpu.is_busy(Operation::DisplayTransfer));
    }

    #[test]
    fn halve_output_scaling() {
        let config = GpuConfig {
            scaling: ScalingInterpretation::HalveOutput,
            flip_axis: FlipAxis::Vertical,
            ..GpuConfig::default()
        };
        let (mut gpu, mock) = make_context(config);
        gpu.write32(DT_OUTPUT_SIZE, 0x0190_00F0).unwrap();
        gpu.write32(DT_FLAGS, 0x0200_0000).unwrap();
        gpu.write32(DT_TRIGGER, 1).unwrap();

        let request = mock.last_transfer();
        assert_eq!(request.flip_axis, FlipAxis::Vertical);
        let TransferKind::Convert(convert) = request.kind else {
            panic!("expected a format conversion");
        };
        assert_eq!(
            convert.scaled_output_size,
            Dimensions {
                width: 120,
                height: 200
            }
        );
    }

    #[test]
    fn texture_copy_line_math() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        gpu.write32(DT_FLAGS, 0x0000_0008).unwrap();
        gpu.write32(DT_TOTAL_BYTES, 0x1200).unwrap();
        gpu.write32(DT_INPUT_LINE, 0x0002_0010).unwrap();
        gpu.write32(DT_OUTPUT_LINE, 0x0000_0012).unwrap();
        gpu.write32(DT_TRIGGER, 1).unwrap();

        let TransferKind::TextureCopy(copy) = mock.last_transfer().kind else {
            panic!("expected a texture copy");
        };
        assert_eq!(copy.total_bytes, 0x1200);
        assert_eq!(copy.input.bytes_per_line, 256);
        assert_eq!(copy.input.padding_bytes_per_line, 32);
        assert_eq!(copy.input.total_bytes_per_line(), 288);
        assert_eq!(copy.output.total_bytes_per_line(), 288);
    }

    #[test]
    fn texture_copy_ignores_format_codes() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        gpu.write32(DT_FLAGS, 0x0000_7708).unwrap();
        gpu.write32(DT_TRIGGER, 1).unwrap();
        assert!(matches!(mock.last_transfer().kind, TransferKind::TextureCopy(_)));
    }

    #[test]
    fn undefined_format_rejects_trigger() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        gpu.write32(DT_FLAGS, 0x0000_0500).unwrap();
        assert_eq!(
            gpu.write32(DT_TRIGGER, 1),
            Err(MmioError::Register(RegisterError::InvalidFormatCode(5)))
        );
        assert_eq!(gpu.read32(DT_TRIGGER), Ok(0));
        assert!(!gpu.is_busy(Operation::DisplayTransfer));
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn busy_trigger_word() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        gpu.write32(DT_TRIGGER, 1).unwrap();

        // Writing 0 does not stop the engine.
        gpu.write32(DT_TRIGGER, 0).unwrap();
        assert_eq!(gpu.read32(DT_TRIGGER), Ok(1));

        // Any nonzero value is a re-trigger.
        assert_eq!(
            gpu.write8(DT_TRIGGER + 2, 0x10),
            Err(MmioError::OperationAlreadyInProgress(Operation::DisplayTransfer))
        );
        assert_eq!(gpu.read32(DT_TRIGGER), Ok(1));
        assert_eq!(mock.calls().len(), 1);
    }
}

// ============================================================================
// Command processor
// ============================================================================

mod command_list_tests {
    use super::*;

    #[test]
    fn launch_and_complete() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        gpu.write32(CP_SIZE, 0x40).unwrap();
        gpu.write32(CP_ADDRESS, 0x0040_0000).unwrap();
        gpu.write32(CP_TRIGGER, 1).unwrap();

        assert!(gpu.is_busy(Operation::CommandList));
        match mock.calls().last() {
            Some(Call::CommandList(request)) => {
                assert_eq!(request.address, 0x0200_0000);
                assert_eq!(request.size_bytes, 0x200);
            }
            other => panic!("expected a command list, got {other:?}"),
        }

        assert_eq!(
            gpu.write32(CP_TRIGGER, 1),
            Err(MmioError::OperationAlreadyInProgress(Operation::CommandList))
        );

        mock.complete_all();
        assert_eq!(gpu.read32(CP_TRIGGER), Ok(0));
        assert_eq!(gpu.state(Operation::CommandList), RegionState::Idle);
    }

    #[test]
    fn only_bit_zero_fires() {
        let (mut gpu, mock) = make_context(GpuConfig::default());
        gpu.write32(CP_TRIGGER, 0x2).unwrap();
        assert!(!gpu.is_busy(Operation::CommandList));
        assert_eq!(gpu.read32(CP_TRIGGER), Ok(0x2));
        assert!(mock.calls().is_empty());

        gpu.write8(CP_TRIGGER, 0x3).unwrap();
        assert!(gpu.is_busy(Operation::CommandList));
    }
}
