use drm_common::{AudioParameters, CodingFamily, RobustnessMode};

use crate::aac::AacParser;
use crate::error::ParseError;
use crate::frame::SuperFrameOutput;
use crate::layout::SuperFrameLayout;
use crate::xheaac::XheAacParser;

/// Common surface both super-frame variants expose. The AAC and
/// xHE-AAC transports have incompatible bitstream layouts but agree on
/// what they hand the decoder: an ordered list of compressed frames,
/// each with its own validity status.
pub trait FrameSource {
    fn parse_super_frame(&mut self, data: &[u8], length_a: usize, length_b: usize) -> SuperFrameOutput;
}

/// Tagged-union dispatch over the two super-frame transports, selected
/// once per `AudioParameters` change and reused until the next reset.
pub enum SuperFrameParser {
    Aac(AacParser),
    XheAac(XheAacParser),
}

impl SuperFrameParser {
    /// Builds the parser variant matching `params`, or an error if no
    /// layout is defined for this robustness mode / sample rate pair.
    pub fn for_parameters(
        params: &AudioParameters,
        robustness: RobustnessMode,
    ) -> Result<SuperFrameParser, ParseError> {
        match params.coding {
            CodingFamily::Aac => {
                let layout = SuperFrameLayout::select(robustness, params.sample_rate)
                    .ok_or(ParseError::NoLayoutForParameters)?;
                Ok(SuperFrameParser::Aac(AacParser::new(layout)))
            }
            CodingFamily::XheAac => Ok(SuperFrameParser::XheAac(XheAacParser::new())),
            CodingFamily::Opus | CodingFamily::None => Err(ParseError::NoLayoutForParameters),
        }
    }
}

impl FrameSource for SuperFrameParser {
    fn parse_super_frame(&mut self, data: &[u8], length_a: usize, length_b: usize) -> SuperFrameOutput {
        match self {
            SuperFrameParser::Aac(parser) => parser.parse(data, length_a, length_b),
            SuperFrameParser::XheAac(parser) => parser.parse(data, length_a + length_b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drm_common::{SampleRate, StereoMode};

    fn params(coding: CodingFamily, sample_rate: SampleRate) -> AudioParameters {
        AudioParameters {
            coding,
            sample_rate,
            stereo_mode: StereoMode::Stereo,
            text_flag: false,
            sbr_flag: false,
            type9_config: Vec::new(),
        }
    }

    #[test]
    fn aac_variant_requires_a_valid_layout() {
        let p = params(CodingFamily::Aac, SampleRate::Hz48000);
        assert!(matches!(
            SuperFrameParser::for_parameters(&p, RobustnessMode::A),
            Err(ParseError::NoLayoutForParameters)
        ));

        let p = params(CodingFamily::Aac, SampleRate::Hz12000);
        assert!(matches!(
            SuperFrameParser::for_parameters(&p, RobustnessMode::A),
            Ok(SuperFrameParser::Aac(_))
        ));
    }

    #[test]
    fn xhe_aac_variant_has_no_layout_dependency() {
        let p = params(CodingFamily::XheAac, SampleRate::Hz48000);
        assert!(matches!(
            SuperFrameParser::for_parameters(&p, RobustnessMode::A),
            Ok(SuperFrameParser::XheAac(_))
        ));
    }
}
