//! Solidity bindings for the functions bulkreg calls.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IRegistrarController {
        function owner() external view returns (address);

        function ownerRegister(
            string name,
            address owner,
            uint256 duration,
            address resolver,
            bytes[] data,
            uint16 ownerControlledFuses,
            bool reverseRecord
        ) external;
    }

    interface IAddrResolver {
        function setAddr(bytes32 node, address a) external;
    }
}
