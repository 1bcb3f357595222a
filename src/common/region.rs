// Handles region things
use aws_config::meta::region::future;
use aws_config::meta::region::ProvideRegion;
use aws_types::region;
use std::env;
use tracing::debug;

/// Region used when neither the command line nor the environment name one.
pub const DEFAULT_REGION: &str = "us-west-1";

#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    region: region::Region,
}

impl Default for Region {
    fn default() -> Self {
        Self::new()
    }
}

impl Region {
    pub fn new() -> Self {
        // By default, we try to get a region from the environment, this might
        // be overridden later depending on CLI options.
        let possibilities = vec![
            env::var("AWS_REGION"),
            env::var("AWS_DEFAULT_REGION"),
        ];

        let region = possibilities
            .iter()
            .filter_map(|region| region.as_ref().ok())
            .find(|region| !region.is_empty())
            .map_or(DEFAULT_REGION, |region| region.as_str());

        debug!("Region from environment is: {:?}", region);

        Self {
            region: region::Region::new(region.to_owned()),
        }
    }

    // Returns the region name
    pub fn name(&self) -> &str {
        self.region.as_ref()
    }

    pub fn set_region(mut self, region: &str) -> Self {
        debug!("Region set to: {:?}", region);

        self.region = region::Region::new(region.to_owned());
        self
    }
}

impl ProvideRegion for Region {
    // Takes our region string and returns a proper AWS Region, this should
    // allow us to pass our Region into AWS SDK functions expecting an AWS
    // Region.
    fn region(&self) -> future::ProvideRegion<'_> {
        future::ProvideRegion::ready(Some(self.region.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_region() {
        let region = Region::new().set_region("eu-west-2");

        assert_eq!(region.name(), "eu-west-2");
    }

    #[tokio::test]
    async fn test_provide_region() {
        let region   = Region::new().set_region("ap-southeast-2");
        let provided = region.region().await;

        assert_eq!(provided, Some(region::Region::new("ap-southeast-2")));
    }
}
